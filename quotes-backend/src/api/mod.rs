use axum::{
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use quotes_core::app::QuoteError;
use quotes_core::transfer::TransferError;
use serde::Serialize;

mod events;
mod quotes;
mod transfer;

use crate::state::AppState;

/// Axum REST API routes.
///
///   GET  /quotes                 -> full quote list
///   POST /quotes                 -> add quote {text, category}
///   GET  /quotes/random?category -> random quote (defaults to saved filter)
///   GET  /categories             -> "all" + unique categories
///   GET  /preferences/category   -> saved filter
///   PUT  /preferences/category   -> change filter, returns a quote for it
///   GET  /last-viewed            -> last quote shown this session
///   GET  /export                 -> quotes.json download
///   POST /import                 -> append quotes from a JSON array body
///   POST /sync                   -> reconcile with the remote source now
///   GET  /sync/state             -> current reconciliation state
///   GET  /events                 -> SSE stream of sync events
///   GET  /status                 -> health check
///   GET  /logs                   -> recent backend log entries
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/quotes", get(quotes::list_quotes).post(quotes::add_quote))
        .route("/quotes/random", get(quotes::random_quote))
        .route("/categories", get(quotes::list_categories))
        .route(
            "/preferences/category",
            get(quotes::get_selected_category).put(quotes::change_filter),
        )
        .route("/last-viewed", get(quotes::last_viewed))
        .route("/export", get(transfer::export_quotes))
        .route("/import", post(transfer::import_quotes))
        .route("/sync", post(events::sync_now))
        .route("/sync/state", get(events::sync_state))
        .route("/events", get(events::sse_events))
        .route("/status", get(events::status))
        .route("/logs", get(events::list_logs))
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn log_api_issue(status: StatusCode, target: &'static str, message: impl AsRef<str>) {
    let message = message.as_ref();
    if status.is_server_error() {
        log::error!(target: target, "{}", message);
    } else {
        log::warn!(target: target, "{}", message);
    }
}

fn api_error(status: StatusCode, target: &'static str, error: String) -> ApiError {
    log_api_issue(status, target, &error);
    (status, Json(ErrorResponse { error }))
}

/// Validation and import problems are the caller's fault; storage and
/// export serialization are ours.
fn quote_error(target: &'static str, e: QuoteError) -> ApiError {
    let status = match e {
        QuoteError::Validation(_) => StatusCode::BAD_REQUEST,
        QuoteError::Transfer(TransferError::Serialize(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        QuoteError::Transfer(_) => StatusCode::BAD_REQUEST,
        QuoteError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    api_error(status, target, e.to_string())
}
