//! Build Beacon
//!
//! Polls a CI console page on a fixed interval and shows the overall health
//! of its builders on a single status light.
//!
//! - `beacon` - watch until Ctrl-C / SIGTERM
//! - `beacon --once` - flash, poll once, show the result, exit

mod args;

use anyhow::{Context, Result};
use args::Cli;
use beacon_core::BeaconConfig;
use beacon_http::{ConsoleClassifier, HttpFetcher};
use beacon_runtime::{Beacon, BeaconController, FadeTimings, PollScheduler};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = BeaconConfig::load(cli.config.as_deref())
        .and_then(|config| cli.apply(config))
        .context("Invalid configuration")?;

    let light = match beacon_device::open(&config.device) {
        Ok(light) => light,
        Err(err) => {
            error!("{err}");
            return Err(err.into());
        }
    };
    info!(light = %light.describe(), "Light ready");

    let fetcher = HttpFetcher::new(config.url.clone(), config.fetch_timeout())
        .context("Failed to build HTTP client")?;
    let classifier =
        ConsoleClassifier::new(config.layout.clone()).context("Invalid console layout")?;
    let controller = BeaconController::new(light)
        .with_timings(FadeTimings::from(&config))
        .with_device_timeout(config.device_timeout());
    let mut beacon = Beacon::new(fetcher, classifier, controller);

    if cli.once {
        let state = beacon.run_once().await;
        info!(%state, "Single poll finished");
        return Ok(());
    }

    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_signal(shutdown.clone()));

    let scheduler = PollScheduler::new(config.interval());
    beacon.run(&scheduler, &shutdown).await;
    info!("Stopped");
    Ok(())
}

async fn cancel_on_signal(shutdown: CancellationToken) {
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!("Cannot listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(err) = result {
                error!("Cannot listen for Ctrl-C: {err}");
                return;
            }
        }
        _ = terminate => {}
    }

    info!("Shutting down");
    shutdown.cancel();
}
