//! Handlers for short URL management.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::short_url::{ShortUrlResponse, ShortUrlStatsResponse, ShortenRequest};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/some/long/path" }
/// ```
///
/// # Errors
///
/// - 400 Bad Request if the URL is missing or not an absolute http(s) URL
/// - 503 Service Unavailable if no free code could be generated
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortUrlResponse>), AppError> {
    payload.validate()?;

    let short_url = state.url_service.shorten(&payload.url).await?;

    Ok((StatusCode::CREATED, Json(short_url.into())))
}

/// Returns the target for a code and counts the access.
///
/// # Endpoint
///
/// `GET /api/shorten/{code}`
pub async fn get_short_url_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ShortUrlStatsResponse>, AppError> {
    let short_url = state.url_service.resolve(&code).await?;
    Ok(Json(short_url.into()))
}

/// Points a code at a new URL.
///
/// # Endpoint
///
/// `PUT /api/shorten/{code}`
pub async fn update_short_url_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortUrlResponse>, AppError> {
    payload.validate()?;

    let short_url = state.url_service.update(&code, &payload.url).await?;
    Ok(Json(short_url.into()))
}

/// Deletes a short URL.
///
/// # Endpoint
///
/// `DELETE /api/shorten/{code}`
pub async fn delete_short_url_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.url_service.delete(&code).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the record and access count without counting this read.
///
/// # Endpoint
///
/// `GET /api/shorten/{code}/stats`
pub async fn short_url_stats_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ShortUrlStatsResponse>, AppError> {
    let short_url = state.url_service.stats(&code).await?;
    Ok(Json(short_url.into()))
}
