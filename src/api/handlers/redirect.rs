//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its target URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Counts the access like `GET /api/shorten/{code}` and answers with
/// `307 Temporary Redirect`, so browsers come back and every visit is
/// counted.
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let short_url = state.url_service.resolve(&code).await?;

    // Stored targets keep the submitted spelling; the parsed form is
    // percent-encoded ASCII and always a valid header value.
    let location = url::Url::parse(&short_url.url).map_err(|e| {
        tracing::error!(error = %e, code, "Stored URL does not parse");
        AppError::internal("Invalid stored URL", json!({}))
    })?;

    tracing::debug!(code, "Redirecting");
    Ok(Redirect::temporary(location.as_str()))
}
