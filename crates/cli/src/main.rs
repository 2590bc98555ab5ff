mod cli;
mod config;
mod input;
mod output;

use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::cli::CliArgs;

fn main() -> Result<()> {
    hwctx_core::load_dotenv();

    // Logs on stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let config = config::resolve(&args)?;
    config.log_summary();

    let docs = args
        .files
        .iter()
        .map(|path| input::load_document(path, &args.doc_type, &args.chip))
        .collect::<Result<Vec<_>>>()?;

    let results = hwctx_chunk::chunk_documents(&docs, &config).context("chunking failed")?;
    info!(
        documents = docs.len(),
        chunks = results.iter().map(Vec::len).sum::<usize>(),
        "All documents chunked"
    );

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    output::write_chunks(&mut out, args.format, &docs, &results)?;
    out.flush()?;

    Ok(())
}
