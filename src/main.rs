use crate::api::{MlApi, TelemetryApi, new_client};
use crate::app_config::AppConfig;
use crate::cache::TtlCache;
use crate::dashboard::Dashboard;
use crate::domain::events::Event;
use crate::extensions::duration_ext::ToShortString;
use crate::loader::Loader;
use crate::poller::{PollRequest, poller};
use crate::store::Store;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task;
use tracing::info;

mod api;
mod app_config;
mod cache;
mod charts;
mod console;
mod dashboard;
mod domain;
mod extensions;
mod loader;
mod navigation;
mod poller;
mod screens;
mod store;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load()?;
    info!("✅  Loaded configuration");

    let telemetry = TelemetryApi::new(new_client(config.telemetry())?, config.telemetry().url());
    let ml = MlApi::new(new_client(config.ml())?, config.ml().url());
    info!(telemetry = telemetry.url(), ml = ml.url(), "✅  Initialized backend clients");

    let cache = Arc::new(TtlCache::new(config.cache().directory(), config.cache().ttl()));
    info!(
        "✅  Initialized cache in '{}', entries expire after {}",
        cache.directory().display(),
        cache.ttl().to_short_string()
    );

    let loader = Loader::new(Arc::new(telemetry), Arc::new(ml), cache.clone());

    let (tx, rx) = mpsc::channel::<Event>(config.core().store_buffer_size());
    let mut store = Store::new(rx);
    let notifier_rx = store.notifier();

    task::spawn(async move {
        store.listen().await;
    });
    info!("✅  Initialized store");

    let (poll_tx, poll_rx) = mpsc::channel::<PollRequest>(config.core().store_buffer_size());
    let poll_interval = config.core().poll_interval();
    task::spawn(async move {
        poller(loader, tx, poll_rx, poll_interval).await;
    });
    info!("✅  Initialized poller, polling every {}", poll_interval.to_short_string());

    info!("🔥 {} is up and running", env!("CARGO_PKG_NAME"));

    console::run(Dashboard::new(&config), notifier_rx, poll_tx, cache).await?;

    Ok(())
}
