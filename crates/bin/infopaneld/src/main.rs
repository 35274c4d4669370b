//! # infopaneld: infopanel daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse the command line and load configuration (file, env vars, secrets)
//! - Install the `tracing` subscriber, including the debug log capture
//! - Spawn the collectors, the device monitor, the clock and the dashboard
//!   refresh loop
//! - Build the axum router, bind to a TCP port and serve
//! - Handle graceful shutdown on Ctrl-C
//!
//! With `--lookup <code>` it resolves one HSL stop code and exits instead.
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;
mod device;
mod feed;
mod log_capture;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use infopanel_adapter_http_axum::state::AppState;
use infopanel_adapter_upstream::{
    ElectricityClient, FmiClient, HslClient, HttpStatusProvider, UpstreamConfig, http_client,
};
use infopanel_app::dashboard::{Clock, DashboardService};
use infopanel_app::device::{DEVICE_INTERVAL, run_device_monitor};
use infopanel_app::poller::{LoggedSource, run_poller};
use infopanel_app::store::StatusStore;

use crate::config::Config;
use crate::device::SysinfoProbe;
use crate::feed::StatusFeed;
use crate::log_capture::StoreLogLayer;

/// Home information panel: electricity prices, bus departures and weather.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file.
    #[arg(long, default_value = "infopanel.toml")]
    config: PathBuf,
    /// Resolve an HSL stop code (e.g. `E2185`) to its GTFS id and exit.
    #[arg(long, value_name = "STOP_CODE")]
    lookup: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    let store = Arc::new(StatusStore::new());
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.logging.filter)?)
        .with(tracing_subscriber::fmt::layer())
        .with(StoreLogLayer::new(Arc::clone(&store)))
        .try_init()?;

    let http = http_client(config.upstream.request_timeout())?;

    if let Some(code) = cli.lookup {
        return lookup(http, &config.upstream, &code).await;
    }

    let feed = match &config.dashboard.status_url {
        Some(url) => {
            let remote = HttpStatusProvider::new(http.clone(), url);
            tracing::info!(url = remote.url(), "reading status from remote instance");
            StatusFeed::Remote(remote)
        }
        None => {
            spawn_pollers(&http, &config.upstream, &store);
            StatusFeed::Local(Arc::clone(&store))
        }
    };

    tokio::spawn(run_device_monitor(
        SysinfoProbe::new(tokio::runtime::Handle::current()),
        Arc::clone(&store),
        DEVICE_INTERVAL,
    ));

    let clock = Arc::new(Clock::new());
    tokio::spawn({
        let clock = Arc::clone(&clock);
        async move { clock.run().await }
    });

    let dashboard = Arc::new(DashboardService::new(feed, config.dashboard.tuning_controls));
    tokio::spawn(Arc::clone(&dashboard).run(config.refresh_interval()));

    let state = AppState::new(store, dashboard, clock, config.debug_json())
        .with_page_refresh_secs(config.dashboard.refresh_secs);
    let app = infopanel_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "infopaneld listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Start one poller per collector; transport needs the HSL key.
fn spawn_pollers(
    http: &reqwest::Client,
    upstream: &UpstreamConfig,
    store: &Arc<StatusStore>,
) {
    tokio::spawn(run_poller(
        LoggedSource::new(
            ElectricityClient::new(http.clone(), upstream),
            Arc::clone(store),
        ),
        upstream.electricity_interval(),
    ));
    tokio::spawn(run_poller(
        LoggedSource::new(FmiClient::new(http.clone(), upstream), Arc::clone(store)),
        upstream.weather_interval(),
    ));
    if upstream.has_hsl_key() {
        tokio::spawn(run_poller(
            LoggedSource::new(HslClient::new(http.clone(), upstream), Arc::clone(store)),
            upstream.transport_interval(),
        ));
    } else {
        tracing::warn!("no HSL api key configured, bus departures disabled");
    }
}

async fn lookup(
    http: reqwest::Client,
    upstream: &UpstreamConfig,
    code: &str,
) -> Result<(), Box<dyn Error>> {
    let gtfs_id = HslClient::new(http, upstream).lookup_stop(code).await?;
    println!("{code} -> {gtfs_id}");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
