use axum::{
    extract::State,
    http::StatusCode,
    response::{sse::Event, Json, Sse},
};
use quotes_core::sync::SyncOutcome;
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use super::{api_error, ApiError};
use crate::state::AppState;

/// SSE endpoint: streams SyncEvent as JSON to connected clients.
pub async fn sse_events(
    State(state): State<AppState>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let rx = state.engine.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(event) => {
            let json = serde_json::to_string(&event).unwrap_or_default();
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    // Keep-alive every 30 seconds
    let stream = stream.merge(tokio_stream::StreamExt::map(
        tokio_stream::wrappers::IntervalStream::new(tokio::time::interval(
            std::time::Duration::from_secs(30),
        )),
        |_| Ok(Event::default().comment("keep-alive")),
    ));

    Sse::new(stream)
}

pub async fn sync_now(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    match state.engine.reconcile().await {
        Ok(SyncOutcome::Completed(report)) => Ok(Json(serde_json::json!({
            "outcome": "completed",
            "report": report,
        }))),
        Ok(SyncOutcome::Skipped) => Ok(Json(serde_json::json!({ "outcome": "skipped" }))),
        Err(e) => Err(api_error(
            StatusCode::BAD_GATEWAY,
            "quotes.api.sync",
            format!("Sync failed: {}", e),
        )),
    }
}

pub async fn sync_state(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "state": state.engine.state(),
        "inFlight": state.engine.is_in_flight(),
    }))
}

pub async fn status(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "running",
        "port": state.port,
        "bind_address": state.bind_address,
        "quotes": state.app.quotes().len(),
        "syncState": state.engine.state(),
    }))
}

pub async fn list_logs() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "entries": crate::logging::recent_entries(),
        "filePath": crate::logging::log_file_path(),
    }))
}
