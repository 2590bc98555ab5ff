use anyhow::{Context, Result};
use tracing::debug;

use hwctx_core::ChunkConfig;

use crate::cli::CliArgs;

/// Effective chunk config. Priority: CLI flag > config file > env var > default.
pub fn resolve(args: &CliArgs) -> Result<ChunkConfig> {
    let base = match &args.config {
        Some(path) => ChunkConfig::load(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => {
            debug!("No config file given, reading chunk settings from env");
            ChunkConfig::from_env()
        }
    };

    let config = apply_overrides(base, args);
    config.validate().context("invalid chunk settings")?;
    Ok(config)
}

fn apply_overrides(mut config: ChunkConfig, args: &CliArgs) -> ChunkConfig {
    if let Some(max) = args.max_tokens {
        config.max_tokens = max;
    }
    if let Some(overlap) = args.overlap_tokens {
        config.overlap_tokens = overlap;
    }
    if let Some(min) = args.min_tokens {
        config.min_tokens = min;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn parse(argv: &[&str]) -> CliArgs {
        let mut full = vec!["hwctx-chunk"];
        full.extend_from_slice(argv);
        full.push("doc.md");
        CliArgs::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[chunk]\nmax_tokens = 300\noverlap_tokens = 30\nmin_tokens = 20").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = resolve(&parse(&["--config", &path, "--min-tokens", "5"])).unwrap();
        assert_eq!(config.max_tokens, 300);
        assert_eq!(config.overlap_tokens, 30);
        assert_eq!(config.min_tokens, 5);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[chunk]\nmax_tokens = 100").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let err = resolve(&parse(&["--config", &path, "--overlap-tokens", "100"])).unwrap_err();
        assert!(format!("{err:#}").contains("overlap_tokens"));
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let err = resolve(&parse(&["--config", "/nonexistent/hwctx.toml"])).unwrap_err();
        assert!(err.to_string().contains("failed to load config"));
    }

    #[test]
    fn test_overrides_leave_unset_fields_alone() {
        let base = ChunkConfig::default();
        let args = parse(&["--max-tokens", "1024"]);
        let config = apply_overrides(base, &args);
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.overlap_tokens, base.overlap_tokens);
        assert_eq!(config.min_tokens, base.min_tokens);
    }
}
