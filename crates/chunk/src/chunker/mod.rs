//! Structure-aware chunking engine for hardware documentation.
//!
//! A normalized markdown document is scanned for atomic blocks (fenced code,
//! tables) and headings, split against a token budget at the coarsest
//! separator that works, stitched together with overlap, merged where pieces
//! are too small, then tagged with a section path and a content type.

mod atomic;
mod classify;
mod engine;
mod helpers;
mod postprocess;
mod section;
mod segmenter;
mod tokens;

pub use atomic::{contains_table, find_protected_spans, ProtectedSpan, SpanKind};
pub use classify::classify;
pub use engine::{chunk, Chunker, MarkdownChunker};
pub use section::{find_headings, Heading, SectionContext};
pub use segmenter::{Segment, Segmenter, SeparatorLevel};
pub use tokens::{count_tokens, HeuristicCounter, TokenCounter, CHARS_PER_TOKEN};
