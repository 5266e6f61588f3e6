use std::collections::BTreeSet;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use remote_job_feed::adapters::ADAPTERS;
use remote_job_feed::aggregate::aggregate;
use remote_job_feed::clock::RunClock;
use remote_job_feed::config::Config;
use remote_job_feed::orchestrator::Orchestrator;
use remote_job_feed::output::write_feed;
use remote_job_feed::session::{ChromeLauncher, ReqwestFetcher};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_tracing()?;

    info!("Starting remote-job-feed");

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    let sources = config.sources().context("Failed to load source registry")?;

    info!(
        output = %config.output_path.display(),
        window_hours = config.recency_window_hours,
        sources = sources.len(),
        "Configuration loaded"
    );

    let clock = RunClock::starting_now(config.recency_window());
    let ctx = config.extract_context(clock);
    let launcher = ChromeLauncher::new(config.browser_options());
    let http = ReqwestFetcher::new(config.http_timeout).context("Failed to build HTTP client")?;

    let orchestrator = Orchestrator::new(sources, &ADAPTERS, config.politeness_delay);
    let raw = orchestrator
        .run(&launcher, &http, &ctx)
        .await
        .context("Browser session could not be started")?;

    let feed = aggregate(raw, &clock);

    if let Err(e) = write_feed(&config.output_path, &feed).await {
        error!(path = %config.output_path.display(), "Failed to save feed: {e:#}");
        return Err(e);
    }

    let boards: BTreeSet<&str> = feed.iter().map(|r| r.source.display_name()).collect();
    info!(
        count = feed.len(),
        sources = ?boards,
        path = %config.output_path.display(),
        "Saved feed"
    );

    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,remote_job_feed=debug"));

    // Check if JSON logging is requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}
