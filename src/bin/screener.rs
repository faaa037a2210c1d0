//! Screener
//!
//! Rates every symbol of a universe on the requested intervals and prints
//! the ones that pass. Exits 2 on setup errors, before any rating request.

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;
use ratingscreen::config::{Args, Endpoints, ScreenConfig};
use ratingscreen::core::run_screen;
use ratingscreen::logging;
use ratingscreen::metrics::Metrics;
use ratingscreen::output;
use ratingscreen::ScreenError;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env if present
    dotenv().ok();

    let args = Args::parse();
    logging::init_logging();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Screener aborted");
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
    }
}

async fn run(args: Args) -> Result<(), ScreenError> {
    let config = ScreenConfig::from_args(args, Endpoints::from_env())?;
    info!(
        environment = %ratingscreen::config::get_environment(),
        label = %config.output.label,
        intervals = ?config.intervals,
        rule = %config.pass_rule.describe(),
        "Starting screener"
    );

    let metrics = Arc::new(
        Metrics::new().map_err(|e| ScreenError::invalid_input(format!("metrics setup failed: {}", e)))?,
    );

    let summary = run_screen(&config, Some(metrics.clone())).await?;

    let rendered = output::render(&summary, config.output.format)?;
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .and_then(|_| stdout.flush())
        .map_err(|e| ScreenError::Output(format!("cannot write to stdout: {}", e)))?;

    if let Some(dir) = &config.output.dir {
        output::write_csv_files(&summary, dir)?;
    }
    if let Some(path) = &config.metrics_file {
        metrics.persist(path);
    }

    info!(
        passed = summary.report.total_entries(),
        failures = summary.report.failure_count(),
        "Screener finished"
    );
    Ok(())
}
