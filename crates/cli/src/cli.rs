use std::path::PathBuf;

use clap::Parser;

/// Count words across files with a two-phase map/reduce run.
///
/// Files are mapped in shortest-first order by size; counts are printed
/// sorted by word, one `word count` pair per line.
#[derive(Parser, Debug)]
#[command(name = "shardmr", about = "Parallel word count over files")]
pub struct CliArgs {
    /// Input files
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Worker threads (0 = one per available core)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Intermediate partitions, one reduce job each
    #[arg(short, long)]
    pub partitions: Option<usize>,

    /// Path to a TOML engine config
    #[arg(long, env = "SHARDMR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the run report as JSON after the counts
    #[arg(long)]
    pub json: bool,
}
