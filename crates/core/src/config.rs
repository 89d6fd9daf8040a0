use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled key: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_opt(lookup: &impl Fn(&str) -> Option<String>, profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = lookup(&prefixed) {
            return Some(v);
        }
    }
    lookup(key)
}

fn profiled_usize(
    lookup: &impl Fn(&str) -> Option<String>,
    profile: &str,
    key: &str,
) -> Result<Option<usize>, ConfigError> {
    match profiled_opt(lookup, profile, key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("{key} must be a non-negative integer, got {raw:?}"))),
        None => Ok(None),
    }
}

// ── Engine config ─────────────────────────────────────────────

/// Settings for a single map/reduce run.
///
/// Parsed from TOML with serde defaults, then overridden by `SHARDMR_*`
/// environment variables. When `SHARDMR_PROFILE` is set (e.g. `BENCH`),
/// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of worker threads. 0 = available parallelism.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Number of intermediate partitions (and reduce tasks).
    #[serde(default = "default_partitions")]
    pub partitions: usize,

    /// Prefix for worker thread names.
    #[serde(default = "default_thread_name_prefix")]
    pub thread_name_prefix: String,
}

fn default_workers() -> usize {
    0
}

fn default_partitions() -> usize {
    8
}

fn default_thread_name_prefix() -> String {
    "shardmr-worker".into()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            partitions: default_partitions(),
            thread_name_prefix: default_thread_name_prefix(),
        }
    }
}

impl EngineConfig {
    /// Shorthand for the common case of fixed worker and partition counts.
    pub fn new(workers: usize, partitions: usize) -> Self {
        Self {
            workers,
            partitions,
            ..Self::default()
        }
    }

    /// Parse config from a TOML string, apply env overrides and validate.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(toml_str)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Build config from defaults plus environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `SHARDMR_*` environment variables.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(env_opt)
    }

    /// Override fields from an arbitrary key lookup. Unset keys leave the
    /// current value untouched.
    pub fn apply_overrides_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let profile = lookup("SHARDMR_PROFILE")
            .map(|p| p.to_uppercase())
            .unwrap_or_default();

        if let Some(workers) = profiled_usize(&lookup, &profile, "SHARDMR_WORKERS")? {
            self.workers = workers;
        }
        if let Some(partitions) = profiled_usize(&lookup, &profile, "SHARDMR_PARTITIONS")? {
            self.partitions = partitions;
        }
        if let Some(prefix) = profiled_opt(&lookup, &profile, "SHARDMR_THREAD_PREFIX") {
            self.thread_name_prefix = prefix;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.partitions == 0 {
            return Err(ConfigError::Invalid("partitions must be at least 1".into()));
        }
        if self.thread_name_prefix.contains('\0') {
            return Err(ConfigError::Invalid("thread_name_prefix must not contain NUL".into()));
        }
        Ok(())
    }

    /// Resolve worker thread count (0 means use available parallelism).
    pub fn resolved_workers(&self) -> usize {
        if self.workers == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        } else {
            self.workers
        }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!(
            workers = self.resolved_workers(),
            partitions = self.partitions,
            thread_name_prefix = %self.thread_name_prefix,
            "engine config loaded"
        );
    }

    /// Resolved view for machine-readable output.
    pub fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "workers": self.resolved_workers(),
            "partitions": self.partitions,
            "thread_name_prefix": self.thread_name_prefix,
        })
    }
}
