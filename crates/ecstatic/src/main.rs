//! ecstatic: one scan over the fleet, then exit
//!
//! Run it from cron or a scheduled task; every run requests at most one
//! agent update per cluster.

use anyhow::{Context, Result};
use clap::Parser;
use ecstatic::aws::{AwsContext, EcsClient, FromAwsContext};
use ecstatic::config::{Args, Config};
use ecstatic::logging;
use ecstatic::notify::SlackWebhook;
use ecstatic::scan::Scanner;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&e);
        std::process::exit(1);
    }
}

/// Print error in a user-friendly way
fn print_error(e: &anyhow::Error) {
    use std::io::Write;

    let mut stderr = std::io::stderr();

    let _ = writeln!(stderr, "\n\x1b[1;31mError:\x1b[0m {e}");

    let mut source = e.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "  \x1b[33mCaused by:\x1b[0m {cause}");
        source = cause.source();
    }
}

async fn run() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e).context("Failed to load .env"),
    }

    let args = Args::parse();
    let config = Config::try_from(args).context("Invalid configuration")?;

    logging::init(config.log_level);
    info!(log_level = %config.log_level, "starting ecstatic");

    let aws = AwsContext::new(
        config.aws.region.as_deref(),
        config.aws.aws_profile.as_deref(),
    )
    .await;
    info!(
        region = aws.region().unwrap_or("unset"),
        profile = ?config.aws.aws_profile,
        api_timeout_secs = config.aws.api_timeout.as_secs(),
        "loaded AWS configuration"
    );

    let ecs = EcsClient::from_context(&aws);
    let webhook = SlackWebhook::new(config.notify.webhook_url.clone(), config.notify.timeout)?;
    let scanner = Scanner::new(ecs, webhook, config.aws.api_timeout);

    let report = if config.scan.clusters.is_empty() {
        scanner.scan_all_clusters().await
    } else {
        info!(clusters = ?config.scan.clusters, "scanning named clusters");
        scanner.scan_clusters(&config.scan.clusters).await
    };

    report.log_summary();

    // Rendering never fails a completed scan.
    if config.scan.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => error!(error = %e, "failed to serialize scan report"),
        }
    }

    Ok(())
}
