use std::path::Path;

use anyhow::{Context, Result};

use hwctx_chunk::chunker::{find_headings, find_protected_spans};
use hwctx_core::NormalizedDocument;

/// Read one markdown file as a normalized document.
///
/// The document id is the file stem; the title is the first level-1 heading
/// outside code and tables, or the stem when there is none.
pub fn load_document(path: &Path, doc_type: &str, chip: &str) -> Result<NormalizedDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .with_context(|| format!("no file name in {}", path.display()))?;
    let title = first_h1(&content).unwrap_or_else(|| stem.clone());

    Ok(NormalizedDocument::new(stem, content)
        .with_type(doc_type)
        .with_chip(chip)
        .with_title(title))
}

fn first_h1(content: &str) -> Option<String> {
    let spans = find_protected_spans(content);
    find_headings(content, &spans)
        .into_iter()
        .find(|h| h.level == 1)
        .map(|h| h.title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_id_from_stem_and_title_from_h1() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rm0090_spi.md");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "```\n# not a title\n```\n\n## Intro\n\n# SPI overview\n\nText.").unwrap();

        let doc = load_document(&path, "reference_manual", "STM32F407").unwrap();
        assert_eq!(doc.document_id, "rm0090_spi");
        assert_eq!(doc.title, "SPI overview");
        assert_eq!(doc.document_type, "reference_manual");
        assert_eq!(doc.chip_or_device_tag, "STM32F407");
    }

    #[test]
    fn test_title_falls_back_to_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "plain text only").unwrap();
        assert_eq!(load_document(&path, "", "").unwrap().title, "notes");
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_document(Path::new("/nonexistent/x.md"), "", "").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/x.md"));
    }
}
