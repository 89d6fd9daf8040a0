mod cli;
mod config;
mod wordcount;

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use shardmr_engine::MapReduce;
use tracing::info;

use crate::cli::CliArgs;

fn main() -> Result<()> {
    shardmr_core::load_dotenv();

    // Logs go to stderr so stdout carries only the counts.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = CliArgs::parse();
    let config = config::resolve(&args).context("failed to load configuration")?;
    config.log_summary();

    let engine = MapReduce::new(config).context("failed to create engine")?;
    let (counts, report) = wordcount::count_files(&engine, args.files.clone())?;
    info!(words = counts.len(), run_id = %report.run_id, "word count complete");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    wordcount::write_counts(&counts, &mut out)?;
    if args.json {
        let summary = serde_json::json!({
            "config": engine.config().summary(),
            "report": report,
        });
        serde_json::to_writer_pretty(&mut out, &summary).context("failed to write report")?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}
