/// Shared application state passed to axum handlers.
use quotes_core::app::QuoteApp;
use quotes_core::sync::SyncEngine;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<QuoteApp>,
    pub engine: Arc<SyncEngine>,
    pub port: u16,
    pub bind_address: String,
}
