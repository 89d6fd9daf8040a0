use anyhow::{Context, Result};
use shardmr_core::EngineConfig;
use tracing::debug;

use crate::cli::CliArgs;

/// Build the engine config: file (or defaults) plus `SHARDMR_*` env, then
/// command-line flags on top.
pub fn resolve(args: &CliArgs) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            debug!(path = %path.display(), "loading engine config file");
            EngineConfig::from_file(path)
                .with_context(|| format!("failed to read {}", path.display()))?
        }
        None => EngineConfig::from_env().context("invalid SHARDMR_* environment")?,
    };

    apply_flags(&mut config, args);
    config.validate().context("invalid engine config")?;
    Ok(config)
}

fn apply_flags(config: &mut EngineConfig, args: &CliArgs) {
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(partitions) = args.partitions {
        config.partitions = partitions;
    }
}
