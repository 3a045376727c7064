//! Quotes backend: config loading, storage init, periodic sync, HTTP server.
pub mod api;
mod config;
mod logging;
pub mod remote;
mod server;
pub mod state;

use crate::remote::HttpRemoteSource;
use crate::state::AppState;
use quotes_core::app::QuoteApp;
use quotes_core::persistence::PersistenceAdapter;
use quotes_core::storage::local::FileKeyValueStore;
use quotes_core::storage::memory::MemoryKeyValueStore;
use quotes_core::sync::{RemoteSource, SyncEngine};
use std::sync::Arc;
use std::time::Duration;

const SERVER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = logging::init() {
        eprintln!("failed to initialize backend logger: {}", e);
    }

    let config_path = config::default_config_path();
    let config = config::load_config(&config_path);
    let log_file = config.log_file();
    if let Err(e) = logging::attach_file(&log_file) {
        log::warn!("Failed to open log file {}: {}", log_file.display(), e);
    }

    // Durable state on disk, session state lives as long as the process
    let durable = Arc::new(FileKeyValueStore::open(config.storage_dir())?);
    let session = Arc::new(MemoryKeyValueStore::new());
    let persistence = Arc::new(PersistenceAdapter::new(durable, session));
    let app = Arc::new(QuoteApp::open(persistence.clone())?);
    log::info!(
        "Storage at {}, {} quotes loaded",
        config.storage_dir().display(),
        app.quotes().len()
    );

    let remote: Arc<dyn RemoteSource> = Arc::new(HttpRemoteSource::new(&config.remote)?);
    let engine = Arc::new(SyncEngine::new(remote, persistence, app.store()));

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let sync_task = if config.sync.enabled {
        Some(engine.clone().spawn_periodic(config.sync.interval(), shutdown_rx.clone()))
    } else {
        log::info!("Periodic sync disabled");
        None
    };

    let state = AppState {
        app,
        engine,
        port: config.port,
        bind_address: config.bind_address.clone(),
    };
    let (_, server_task) = server::spawn_server(state, shutdown_rx).await?;

    tokio::signal::ctrl_c().await?;
    log::info!("Shutdown requested");
    let _ = shutdown_tx.send(true);
    if let Some(task) = sync_task {
        let _ = task.await;
    }
    // Event streams never finish on their own
    if tokio::time::timeout(SERVER_DRAIN_TIMEOUT, server_task).await.is_err() {
        log::warn!("HTTP connections still open after {:?}, exiting", SERVER_DRAIN_TIMEOUT);
    }
    Ok(())
}
