use serde::{Deserialize, Serialize};

/// Unique document identifier (one per source file).
pub type DocId = String;

/// A document already normalized to markdown by an upstream extractor.
///
/// The engine reads it and never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedDocument {
    pub document_id: DocId,
    /// Clean markdown, front-matter and boilerplate already stripped.
    pub content: String,
    /// Free-form tag such as "datasheet", "register-map" or "errata".
    #[serde(default)]
    pub document_type: String,
    /// Chip or device the document belongs to; may be empty.
    #[serde(default)]
    pub chip_or_device_tag: String,
    #[serde(default)]
    pub title: String,
    /// Page hint copied onto every chunk, 0 when unknown.
    #[serde(default)]
    pub page_number: u32,
}

impl NormalizedDocument {
    pub fn new(document_id: impl Into<DocId>, content: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, document_type: impl Into<String>) -> Self {
        self.document_type = document_type.into();
        self
    }

    pub fn with_chip(mut self, chip: impl Into<String>) -> Self {
        self.chip_or_device_tag = chip.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// True when the content holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}
