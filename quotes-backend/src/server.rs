/// HTTP server: binds the configured address and serves the API until the
/// shutdown flag flips.
use crate::api::api_router;
use crate::state::AppState;
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};

/// API routes with open CORS, ready to serve.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    api_router().layer(cors).with_state(state)
}

/// Bind and serve on a background task. Returns the bound address (port 0
/// picks a free one) and the serve task, which ends after `shutdown` is set
/// and open connections drain.
pub async fn spawn_server(
    state: AppState,
    mut shutdown: watch::Receiver<bool>,
) -> std::io::Result<(SocketAddr, JoinHandle<()>)> {
    let listener = TcpListener::bind((state.bind_address.as_str(), state.port)).await?;
    let addr = listener.local_addr()?;
    log::info!(target: "quotes.api", "HTTP server listening on http://{}", addr);

    let app = router(state);
    let handle = tokio::spawn(async move {
        let stop = async move {
            while !*shutdown.borrow() {
                if shutdown.changed().await.is_err() {
                    break;
                }
            }
        };
        match axum::serve(listener, app).with_graceful_shutdown(stop).await {
            Ok(()) => log::info!(target: "quotes.api", "HTTP server stopped"),
            Err(e) => log::error!(target: "quotes.api", "HTTP server exited with error: {}", e),
        }
    });

    Ok((addr, handle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::HttpRemoteSource;
    use quotes_core::app::QuoteApp;
    use quotes_core::config::RemoteSettings;
    use quotes_core::persistence::PersistenceAdapter;
    use quotes_core::storage::memory::MemoryKeyValueStore;
    use quotes_core::sync::SyncEngine;
    use std::sync::Arc;

    fn test_state() -> AppState {
        let persistence = Arc::new(PersistenceAdapter::new(
            Arc::new(MemoryKeyValueStore::new()),
            Arc::new(MemoryKeyValueStore::new()),
        ));
        let app = Arc::new(QuoteApp::open(persistence.clone()).unwrap());
        let remote = Arc::new(HttpRemoteSource::new(&RemoteSettings::default()).unwrap());
        let engine = Arc::new(SyncEngine::new(remote, persistence, app.store()));
        AppState {
            app,
            engine,
            port: 0,
            bind_address: "127.0.0.1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_serves_until_shutdown() {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (addr, handle) = spawn_server(test_state(), shutdown_rx).await.unwrap();
        assert_ne!(addr.port(), 0);

        let body: serde_json::Value = reqwest::get(format!("http://{}/quotes", addr))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["quotes"].as_array().map(|a| a.len()), Some(3));

        shutdown_tx.send(true).unwrap();
        tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
