use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use quotes_core::types::{Quote, NO_QUOTES_MESSAGE};
use serde::Deserialize;

use super::{quote_error, ApiError};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AddQuoteBody {
    #[serde(default)]
    text: String,
    #[serde(default)]
    category: String,
}

#[derive(Deserialize)]
pub struct RandomQuery {
    category: Option<String>,
}

#[derive(Deserialize)]
pub struct CategoryBody {
    category: String,
}

fn shown(category: &str, quote: Option<Quote>) -> Json<serde_json::Value> {
    let display = quote
        .as_ref()
        .map(Quote::display)
        .unwrap_or_else(|| NO_QUOTES_MESSAGE.to_string());
    Json(serde_json::json!({
        "category": category,
        "quote": quote,
        "display": display,
    }))
}

pub async fn list_quotes(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "quotes": state.app.quotes() }))
}

pub async fn add_quote(
    State(state): State<AppState>,
    Json(body): Json<AddQuoteBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let quote = state
        .app
        .add_quote(&body.text, &body.category)
        .map_err(|e| quote_error("quotes.api.add_quote", e))?;

    let remote = state.engine.remote();
    let posted = quote.clone();
    tokio::spawn(async move {
        if let Err(e) = remote.push_quote(&posted).await {
            log::warn!(target: "quotes.remote", "Failed to post quote to server: {}", e);
        }
    });

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "quote": quote,
            "categories": state.app.category_options(),
        })),
    ))
}

pub async fn random_quote(
    State(state): State<AppState>,
    Query(params): Query<RandomQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let category = match params.category {
        Some(c) => c,
        None => state
            .app
            .selected_category()
            .map_err(|e| quote_error("quotes.api.random", e))?,
    };
    let quote = state
        .app
        .show_random(&category)
        .map_err(|e| quote_error("quotes.api.random", e))?;
    Ok(shown(&category, quote))
}

pub async fn list_categories(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "categories": state.app.category_options() }))
}

pub async fn get_selected_category(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let category = state
        .app
        .selected_category()
        .map_err(|e| quote_error("quotes.api.preferences", e))?;
    Ok(Json(serde_json::json!({ "category": category })))
}

pub async fn change_filter(
    State(state): State<AppState>,
    Json(body): Json<CategoryBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let quote = state
        .app
        .change_filter(&body.category)
        .map_err(|e| quote_error("quotes.api.preferences", e))?;
    Ok(shown(&body.category, quote))
}

pub async fn last_viewed(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let quote = state
        .app
        .last_viewed()
        .map_err(|e| quote_error("quotes.api.last_viewed", e))?;
    Ok(Json(serde_json::json!({ "quote": quote })))
}
