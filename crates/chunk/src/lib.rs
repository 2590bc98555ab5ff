pub mod batch;
pub mod chunker;

pub use batch::{chunk_documents, chunk_documents_with};
pub use chunker::{chunk, classify, count_tokens, Chunker, HeuristicCounter, MarkdownChunker, TokenCounter};
pub use hwctx_core::{
    Chunk, ChunkConfig, ChunkError, ChunkLevel, ChunkMetadata, ContentType, NormalizedDocument,
};
