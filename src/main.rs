use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use brc::report::write_report;
use brc::{aggregate, Config, Dispatch};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about = "Per-station min/avg/max over a measurements file")]
struct Args {
    /// `<station>;<reading>` file to aggregate.
    path: PathBuf,

    /// Worker threads (defaults to available parallelism).
    #[arg(short, long, env = "BRC_WORKERS")]
    workers: Option<NonZeroUsize>,

    /// Target chunk size in bytes (defaults to one chunk per worker).
    #[arg(long, env = "BRC_CHUNK_SIZE")]
    chunk_size: Option<NonZeroUsize>,

    /// How chunks are handed to workers: pull or push.
    #[arg(long, default_value_t = Dispatch::Pull)]
    dispatch: Dispatch,

    /// Log phase timings to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let mut config = Config::default()
        .chunk_size(args.chunk_size)
        .dispatch(args.dispatch);
    if let Some(workers) = args.workers {
        config = config.workers(workers);
    }

    let start = Instant::now();
    let file = File::open(&args.path)
        .with_context(|| format!("failed to open {}", args.path.display()))?;
    let measurements = aggregate(&file, &config)
        .with_context(|| format!("failed to aggregate {}", args.path.display()))?;
    tracing::info!(keys = measurements.len(), elapsed = ?start.elapsed(), "aggregated");

    let mut out = BufWriter::new(io::stdout().lock());
    write_report(&mut out, &measurements)?;
    out.flush()?;
    Ok(())
}
