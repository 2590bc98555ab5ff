use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Chunk hardware documentation into labeled, token-bounded pieces.
///
/// Each input file is treated as one normalized markdown document. Chunks
/// are printed to stdout in argument order; logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "hwctx-chunk", version, about)]
pub struct CliArgs {
    /// Markdown files to chunk
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Project config file; its `[chunk]` table replaces env settings
    #[arg(long, env = "HWCTX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Maximum tokens per chunk (overrides config)
    #[arg(long)]
    pub max_tokens: Option<usize>,

    /// Tokens repeated between consecutive chunks (overrides config)
    #[arg(long)]
    pub overlap_tokens: Option<usize>,

    /// Chunks below this size are merged (overrides config)
    #[arg(long)]
    pub min_tokens: Option<usize>,

    /// Document type stored on every chunk, e.g. datasheet or errata
    #[arg(long, env = "HWCTX_DOC_TYPE", default_value = "")]
    pub doc_type: String,

    /// Chip or device tag stored on every chunk, e.g. STM32F407
    #[arg(long, env = "HWCTX_CHIP", default_value = "")]
    pub chip: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// One pretty-printed JSON array with every chunk
    Json,
    /// One compact JSON object per line
    Jsonl,
    /// Human-readable table per document
    Summary,
}
