use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::Json,
};
use quotes_core::transfer::EXPORT_FILE_NAME;

use super::{quote_error, ApiError};
use crate::state::AppState;

pub async fn export_quotes(State(state): State<AppState>) -> Result<(HeaderMap, Vec<u8>), ApiError> {
    let body = state
        .app
        .export_quotes()
        .map_err(|e| quote_error("quotes.api.export", e))?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    let disposition = format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME);
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    Ok((headers, body))
}

pub async fn import_quotes(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ApiError> {
    let imported = state
        .app
        .import_quotes(&body)
        .map_err(|e| quote_error("quotes.api.import", e))?;
    Ok(Json(serde_json::json!({
        "imported": imported,
        "categories": state.app.category_options(),
    })))
}
