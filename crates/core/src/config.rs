use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ChunkError, ConfigError};

pub const DEFAULT_MAX_TOKENS: usize = 512;
pub const DEFAULT_OVERLAP_TOKENS: usize = 50;
pub const DEFAULT_MIN_TOKENS: usize = 50;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

// ── Chunk config ──────────────────────────────────────────────

/// Token budgets for the chunking engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkConfig {
    /// Upper bound per chunk (default: 512). Only oversized atomic blocks exceed it.
    pub max_tokens: usize,
    /// Trailing tokens of a chunk repeated at the start of the next (default: 50).
    pub overlap_tokens: usize,
    /// Chunks below this size are merged into a neighbour (default: 50).
    pub min_tokens: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            overlap_tokens: DEFAULT_OVERLAP_TOKENS,
            min_tokens: DEFAULT_MIN_TOKENS,
        }
    }
}

/// Only the `[chunk]` table of a project config file is read.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    chunk: ChunkConfig,
}

impl ChunkConfig {
    /// Config with overlap and minimum size both at 10% of `max_tokens`.
    pub fn with_max_tokens(max_tokens: usize) -> Self {
        Self {
            max_tokens,
            overlap_tokens: max_tokens / 10,
            min_tokens: max_tokens / 10,
        }
    }

    /// Reject budgets the engine cannot honour.
    pub fn validate(&self) -> Result<(), ChunkError> {
        if self.max_tokens == 0 {
            return Err(ChunkError::InvalidConfig(
                "max_tokens must be greater than 0".to_string(),
            ));
        }
        if self.overlap_tokens >= self.max_tokens {
            return Err(ChunkError::InvalidConfig(format!(
                "overlap_tokens ({}) must be less than max_tokens ({})",
                self.overlap_tokens, self.max_tokens
            )));
        }
        if self.min_tokens >= self.max_tokens {
            return Err(ChunkError::InvalidConfig(format!(
                "min_tokens ({}) must be less than max_tokens ({})",
                self.min_tokens, self.max_tokens
            )));
        }
        Ok(())
    }

    /// Budget available to the segmenter once room for overlap is reserved.
    pub fn split_budget(&self) -> usize {
        self.max_tokens.saturating_sub(self.overlap_tokens).max(1)
    }

    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `HWCTX_PROFILE`. When set (e.g. `PROD`), every key
    /// is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("HWCTX_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            max_tokens: profiled_env_usize(p, "CHUNK_MAX_TOKENS", DEFAULT_MAX_TOKENS),
            overlap_tokens: profiled_env_usize(p, "CHUNK_OVERLAP_TOKENS", DEFAULT_OVERLAP_TOKENS),
            min_tokens: profiled_env_usize(p, "CHUNK_MIN_TOKENS", DEFAULT_MIN_TOKENS),
        }
    }

    /// Parse the `[chunk]` table of a TOML document. Missing keys get defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(raw)?;
        file.chunk.validate()?;
        Ok(file.chunk)
    }

    /// Load and validate the `[chunk]` table from a config file on disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!(path = %path.display(), "loaded chunk config");
        Ok(config)
    }

    /// Print the effective budgets for startup logs.
    pub fn log_summary(&self) {
        tracing::info!(
            "  chunk:       max_tokens={}, overlap_tokens={}, min_tokens={}",
            self.max_tokens,
            self.overlap_tokens,
            self.min_tokens
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = ChunkConfig::default();
        assert_eq!(cfg.max_tokens, 512);
        assert_eq!(cfg.overlap_tokens, 50);
        assert_eq!(cfg.min_tokens, 50);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn with_max_tokens_derives_ten_percent() {
        let cfg = ChunkConfig::with_max_tokens(1000);
        assert_eq!(cfg.overlap_tokens, 100);
        assert_eq!(cfg.min_tokens, 100);
    }

    #[test]
    fn overlap_at_or_above_max_is_invalid() {
        let cfg = ChunkConfig {
            max_tokens: 100,
            overlap_tokens: 100,
            min_tokens: 10,
        };
        assert!(matches!(cfg.validate(), Err(ChunkError::InvalidConfig(_))));
    }

    #[test]
    fn min_at_or_above_max_is_invalid() {
        let cfg = ChunkConfig {
            max_tokens: 100,
            overlap_tokens: 10,
            min_tokens: 150,
        };
        assert!(matches!(cfg.validate(), Err(ChunkError::InvalidConfig(_))));
    }

    #[test]
    fn zero_max_is_invalid() {
        let cfg = ChunkConfig {
            max_tokens: 0,
            overlap_tokens: 0,
            min_tokens: 0,
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn split_budget_reserves_overlap() {
        assert_eq!(ChunkConfig::default().split_budget(), 462);
        let no_overlap = ChunkConfig {
            max_tokens: 64,
            overlap_tokens: 0,
            min_tokens: 0,
        };
        assert_eq!(no_overlap.split_budget(), 64);
    }

    #[test]
    fn toml_chunk_section_is_read_and_other_sections_ignored() {
        let raw = r#"
[project]
name = "motor-controller"

[chunk]
max_tokens = 256
overlap_tokens = 20
"#;
        let cfg = ChunkConfig::from_toml_str(raw).unwrap();
        assert_eq!(cfg.max_tokens, 256);
        assert_eq!(cfg.overlap_tokens, 20);
        assert_eq!(cfg.min_tokens, DEFAULT_MIN_TOKENS);
    }

    #[test]
    fn toml_without_chunk_section_uses_defaults() {
        let cfg = ChunkConfig::from_toml_str("[embedding]\nmodel = \"nomic-embed-text\"\n").unwrap();
        assert_eq!(cfg, ChunkConfig::default());
    }

    #[test]
    fn toml_with_invalid_budget_is_rejected() {
        let err = ChunkConfig::from_toml_str("[chunk]\nmax_tokens = 40\nmin_tokens = 40\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ChunkError::InvalidConfig(_))));
    }

    #[test]
    fn load_reads_config_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[chunk]\nmax_tokens = 300\noverlap_tokens = 30\nmin_tokens = 30").unwrap();
        let cfg = ChunkConfig::load(file.path()).unwrap();
        assert_eq!(cfg.max_tokens, 300);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = ChunkConfig::load(Path::new("/nonexistent/hwctx/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn profiled_env_overrides_default_key() {
        // Keys are unique to this test so parallel tests don't interfere.
        env::set_var("HWCTXTEST_CHUNK_MAX_TOKENS", "1024");
        let cfg = ChunkConfig::for_profile("hwctxtest");
        assert_eq!(cfg.max_tokens, 1024);
        env::remove_var("HWCTXTEST_CHUNK_MAX_TOKENS");
    }
}
