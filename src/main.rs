//! Entry point for riccar-fetch.
//! Handles CLI parsing and logging setup, then runs the download and merge stages.

use clap::Parser;
use riccar_fetch::cli::Args;
use riccar_fetch::download::HttpFetcher;
use riccar_fetch::pipeline::run;
use riccar_fetch::progress::LogWriter;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(LogWriter::default)
        .init();

    let catalog = args.load_catalog()?;
    let config = args.run_config()?;
    let fetcher = Arc::new(HttpFetcher::new(args.request_timeout())?);

    let report = run(&catalog, &config, fetcher).await?;

    info!(
        downloaded = report.download.downloaded,
        skipped = report.download.skipped,
        failed = report.download.failed,
        cropped = report.download.cropped,
        "Finished downloads"
    );
    if let Some(merge) = report.merge {
        info!(
            written = merge.written,
            unchanged = merge.unchanged,
            empty = merge.empty,
            failed = merge.failed,
            "Finished period merges"
        );
    }

    Ok(())
}
