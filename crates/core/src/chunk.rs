use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::{DocId, NormalizedDocument};
use crate::error::UnknownLabel;

/// Domain-aware label describing what a chunk is mostly about.
///
/// Stored downstream as the snake_case string returned by [`ContentType::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Code,
    RegisterTable,
    RegisterDescription,
    TimingSpec,
    ConfigProcedure,
    Errata,
    PinMapping,
    ElectricalSpec,
    ApiReference,
    Table,
    Section,
    Prose,
}

impl ContentType {
    pub const ALL: [ContentType; 12] = [
        ContentType::Code,
        ContentType::RegisterTable,
        ContentType::RegisterDescription,
        ContentType::TimingSpec,
        ContentType::ConfigProcedure,
        ContentType::Errata,
        ContentType::PinMapping,
        ContentType::ElectricalSpec,
        ContentType::ApiReference,
        ContentType::Table,
        ContentType::Section,
        ContentType::Prose,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Code => "code",
            ContentType::RegisterTable => "register_table",
            ContentType::RegisterDescription => "register_description",
            ContentType::TimingSpec => "timing_spec",
            ContentType::ConfigProcedure => "config_procedure",
            ContentType::Errata => "errata",
            ContentType::PinMapping => "pin_mapping",
            ContentType::ElectricalSpec => "electrical_spec",
            ContentType::ApiReference => "api_reference",
            ContentType::Table => "table",
            ContentType::Section => "section",
            ContentType::Prose => "prose",
        }
    }

    /// Labels produced only when the chunk holds a markdown table.
    pub fn is_table_kind(&self) -> bool {
        matches!(
            self,
            ContentType::RegisterTable
                | ContentType::PinMapping
                | ContentType::ElectricalSpec
                | ContentType::TimingSpec
                | ContentType::Table
        )
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentType::ALL
            .iter()
            .find(|ct| ct.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

/// Granularity of a chunk. The engine only emits `Detail`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkLevel {
    Summary,
    #[default]
    Detail,
}

impl ChunkLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkLevel::Summary => "summary",
            ChunkLevel::Detail => "detail",
        }
    }
}

impl fmt::Display for ChunkLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChunkLevel {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summary" => Ok(ChunkLevel::Summary),
            "detail" => Ok(ChunkLevel::Detail),
            other => Err(UnknownLabel(other.to_string())),
        }
    }
}

/// Metadata attached to every chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub document_id: DocId,
    pub document_type: String,
    pub chip_or_device_tag: String,
    /// Heading breadcrumb, e.g. "SPI > Configuration > DMA".
    pub section_path: String,
    /// Copied from the document, 0 when unknown.
    pub page_number: u32,
    pub chunk_level: ChunkLevel,
    /// Filled by downstream heuristics; always empty here.
    pub peripheral_or_component: String,
    pub content_type: ContentType,
}

impl ChunkMetadata {
    /// Metadata seeded from the document's pass-through fields.
    pub fn for_document(
        doc: &NormalizedDocument,
        section_path: String,
        content_type: ContentType,
    ) -> Self {
        Self {
            document_id: doc.document_id.clone(),
            document_type: doc.document_type.clone(),
            chip_or_device_tag: doc.chip_or_device_tag.clone(),
            section_path,
            page_number: doc.page_number,
            chunk_level: ChunkLevel::default(),
            peripheral_or_component: String::new(),
            content_type,
        }
    }

    /// Flat key/value view for vector store metadata columns.
    pub fn to_storage_fields(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut fields = serde_json::Map::new();
        fields.insert("document_id".into(), self.document_id.clone().into());
        fields.insert("document_type".into(), self.document_type.clone().into());
        fields.insert("chip_or_device_tag".into(), self.chip_or_device_tag.clone().into());
        fields.insert("section_path".into(), self.section_path.clone().into());
        fields.insert("page_number".into(), self.page_number.into());
        fields.insert("chunk_level".into(), self.chunk_level.as_str().into());
        fields.insert(
            "peripheral_or_component".into(),
            self.peripheral_or_component.clone().into(),
        );
        fields.insert("content_type".into(), self.content_type.as_str().into());
        fields
    }
}

/// One bounded, labeled segment of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// `"{document_id}-{sequence_number}"`, 0-based and dense.
    pub chunk_id: String,
    /// Injected overlap followed by the chunk's own source text.
    pub content: String,
    pub token_count: usize,
    pub metadata: ChunkMetadata,
    /// Byte range of the source text covered, overlap excluded.
    pub start_offset: usize,
    pub end_offset: usize,
    /// Length in bytes of the overlap prefix at the start of `content`.
    pub overlap_len: usize,
}

impl Chunk {
    pub fn make_id(document_id: &str, sequence: usize) -> String {
        format!("{document_id}-{sequence}")
    }

    /// The chunk's own source text, without the overlap prefix.
    pub fn body(&self) -> &str {
        &self.content[self.overlap_len..]
    }

    /// The injected overlap prefix (empty when none was added).
    pub fn overlap(&self) -> &str {
        &self.content[..self.overlap_len]
    }
}
