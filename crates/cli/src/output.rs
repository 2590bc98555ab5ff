use std::io::Write;

use anyhow::Result;

use hwctx_core::{Chunk, NormalizedDocument};

use crate::cli::OutputFormat;

/// Print every document's chunks in the requested format.
pub fn write_chunks<W: Write>(
    out: &mut W,
    format: OutputFormat,
    docs: &[NormalizedDocument],
    results: &[Vec<Chunk>],
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let all: Vec<&Chunk> = results.iter().flatten().collect();
            serde_json::to_writer_pretty(&mut *out, &all)?;
            writeln!(out)?;
        }
        OutputFormat::Jsonl => {
            for chunk in results.iter().flatten() {
                serde_json::to_writer(&mut *out, chunk)?;
                writeln!(out)?;
            }
        }
        OutputFormat::Summary => {
            for (doc, chunks) in docs.iter().zip(results) {
                write_summary(out, doc, chunks)?;
            }
        }
    }
    Ok(())
}

fn write_summary<W: Write>(out: &mut W, doc: &NormalizedDocument, chunks: &[Chunk]) -> Result<()> {
    let total: usize = chunks.iter().map(|c| c.token_count).sum();
    writeln!(
        out,
        "{} ({}): {} chunks, {} tokens",
        doc.document_id,
        doc.title,
        chunks.len(),
        total
    )?;
    for c in chunks {
        writeln!(
            out,
            "  {:<24} {:>6}  {:<22} {}",
            c.chunk_id,
            c.token_count,
            c.metadata.content_type.as_str(),
            c.metadata.section_path
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hwctx_core::ChunkConfig;

    fn sample() -> (Vec<NormalizedDocument>, Vec<Vec<Chunk>>) {
        let docs = vec![
            NormalizedDocument::new("spi", "# SPI\n\nThe SPI bus.").with_title("SPI"),
            NormalizedDocument::new("empty", "").with_title("empty"),
        ];
        let results = hwctx_chunk::chunk_documents(&docs, &ChunkConfig::default()).unwrap();
        (docs, results)
    }

    fn render(format: OutputFormat) -> String {
        let (docs, results) = sample();
        let mut buf = Vec::new();
        write_chunks(&mut buf, format, &docs, &results).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_jsonl_has_one_chunk_per_line() {
        let text = render(OutputFormat::Jsonl);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 1);
        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["chunk_id"], "spi-0");
        assert_eq!(value["metadata"]["content_type"], "prose");
    }

    #[test]
    fn test_json_is_a_single_array() {
        let value: serde_json::Value = serde_json::from_str(&render(OutputFormat::Json)).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_summary_lists_every_document() {
        let text = render(OutputFormat::Summary);
        assert!(text.contains("spi (SPI): 1 chunks"));
        assert!(text.contains("empty (empty): 0 chunks, 0 tokens"));
        assert!(text.contains("spi-0"));
        assert!(text.contains("prose"));
    }
}
