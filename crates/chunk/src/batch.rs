//! Parallel chunking of many documents.

use std::time::Instant;

use hwctx_core::{Chunk, ChunkConfig, ChunkError, NormalizedDocument};
use rayon::prelude::*;
use tracing::info;

use crate::chunker::{Chunker, MarkdownChunker};

/// Chunk every document with the default chunker, in parallel.
///
/// The result holds one chunk list per input document, in input order.
pub fn chunk_documents(
    docs: &[NormalizedDocument],
    config: &ChunkConfig,
) -> Result<Vec<Vec<Chunk>>, ChunkError> {
    let chunker = MarkdownChunker::new(*config)?;
    chunk_documents_with(&chunker, docs)
}

/// Same as [`chunk_documents`] with a caller-supplied chunker.
pub fn chunk_documents_with<K: Chunker + ?Sized>(
    chunker: &K,
    docs: &[NormalizedDocument],
) -> Result<Vec<Vec<Chunk>>, ChunkError> {
    let start = Instant::now();

    let results: Vec<Vec<Chunk>> = docs
        .par_iter()
        .map(|doc| chunker.chunk(doc))
        .collect::<Result<_, _>>()?;

    let total: usize = results.iter().map(Vec::len).sum();
    info!(
        documents = docs.len(),
        chunks = total,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "batch chunked"
    );

    Ok(results)
}
