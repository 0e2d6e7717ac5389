use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::builder::{OsStringValueParser, TypedValueParser};
use clap::Parser;
use job_inventory_core::{run_inventory, InventoryOptions};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "job-inventory",
    version,
    about = "Report the assigned node of every Maven job under a Jenkins job directory."
)]
struct Cli {
    /// Job directory to scan for config.xml files.
    // clap's stock PathBuf parser rejects "", which must reach the walker instead.
    #[arg(
        long = "job-dir",
        value_name = "PATH",
        default_value = "",
        value_parser = OsStringValueParser::new().map(PathBuf::from)
    )]
    job_dir: PathBuf,
}

impl From<Cli> for InventoryOptions {
    fn from(cli: Cli) -> Self {
        InventoryOptions {
            job_dir: cli.job_dir,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let options: InventoryOptions = Cli::parse().into();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = run_inventory(&options, &mut out)
        .with_context(|| format!("job inventory of {:?} failed", options.job_dir))?;
    out.flush().context("failed to flush report")?;

    info!(
        "Reported {} maven job(s); skipped {} freestyle and {} unknown",
        summary.maven_jobs, summary.freestyle_jobs, summary.unknown_jobs
    );
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
