use hwctx_core::{Chunk, ChunkConfig, ChunkError, ChunkMetadata, NormalizedDocument};
use tracing::{debug, info};

use super::atomic::find_protected_spans;
use super::classify::classify;
use super::helpers::leading_ws_len;
use super::postprocess::PostProcessor;
use super::section::{find_headings, SectionTracker};
use super::segmenter::Segmenter;
use super::tokens::{HeuristicCounter, TokenCounter};

/// Turns one normalized document into an ordered list of chunks.
pub trait Chunker: Send + Sync {
    fn chunk(&self, doc: &NormalizedDocument) -> Result<Vec<Chunk>, ChunkError>;
}

/// Structure-aware markdown chunker.
///
/// Holds a validated [`ChunkConfig`] and a token counter; all per-document
/// state lives inside a single [`Chunker::chunk`] call, so one instance can
/// be shared across threads.
#[derive(Debug, Clone)]
pub struct MarkdownChunker<C: TokenCounter = HeuristicCounter> {
    config: ChunkConfig,
    counter: C,
}

impl MarkdownChunker<HeuristicCounter> {
    pub fn new(config: ChunkConfig) -> Result<Self, ChunkError> {
        Self::with_counter(config, HeuristicCounter)
    }
}

impl<C: TokenCounter> MarkdownChunker<C> {
    pub fn with_counter(config: ChunkConfig, counter: C) -> Result<Self, ChunkError> {
        config.validate()?;
        Ok(Self { config, counter })
    }

    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    pub fn counter(&self) -> &C {
        &self.counter
    }
}

impl<C: TokenCounter> Chunker for MarkdownChunker<C> {
    fn chunk(&self, doc: &NormalizedDocument) -> Result<Vec<Chunk>, ChunkError> {
        if doc.is_blank() {
            debug!(document_id = %doc.document_id, "blank document, no chunks");
            return Ok(Vec::new());
        }

        let text = doc.content.as_str();
        let spans = find_protected_spans(text);
        let headings = find_headings(text, &spans);
        debug!(
            document_id = %doc.document_id,
            protected_spans = spans.len(),
            headings = headings.len(),
            "document scanned"
        );

        let segments = Segmenter::new(
            text,
            &spans,
            &headings,
            &self.counter,
            self.config.split_budget(),
        )
        .segment();

        debug!(
            document_id = %doc.document_id,
            segments = segments.len(),
            oversized = segments.iter().filter(|s| s.oversized).count(),
            "document segmented"
        );

        let post = PostProcessor::new(text, &spans, &self.counter, &self.config);
        let drafts = post.merge_small(post.apply_overlap(&segments));

        let mut sections = SectionTracker::new(&headings);
        let chunks: Vec<Chunk> = drafts
            .iter()
            .enumerate()
            .map(|(seq, draft)| {
                let body = &text[draft.range.clone()];
                let section_path = sections.advance_to(draft.range.start + leading_ws_len(body));
                let content = draft.content(text);
                let metadata =
                    ChunkMetadata::for_document(doc, section_path, classify(content));

                Chunk {
                    chunk_id: Chunk::make_id(&doc.document_id, seq),
                    content: content.to_string(),
                    token_count: draft.tokens,
                    metadata,
                    start_offset: draft.range.start,
                    end_offset: draft.range.end,
                    overlap_len: draft.overlap_len(),
                }
            })
            .collect();

        info!(
            document_id = %doc.document_id,
            chunks = chunks.len(),
            max_tokens = self.config.max_tokens,
            overlap_tokens = self.config.overlap_tokens,
            "document chunked"
        );

        Ok(chunks)
    }
}

/// Chunk a document with the default token counter.
///
/// Fails only on an invalid `config`, before any text is touched.
pub fn chunk(doc: &NormalizedDocument, config: &ChunkConfig) -> Result<Vec<Chunk>, ChunkError> {
    MarkdownChunker::new(*config)?.chunk(doc)
}
