//! DTOs for short URL endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::ShortUrl;

/// Request body for `POST /api/shorten` and `PUT /api/shorten/{code}`.
///
/// Format checks (scheme, host) happen in the service; this only caps size.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[serde(default)]
    #[validate(length(max = 2048, message = "Url is too long"))]
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ShortUrlResponse {
    pub id: i64,
    pub url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ShortUrl> for ShortUrlResponse {
    fn from(short_url: ShortUrl) -> Self {
        Self {
            id: short_url.id,
            url: short_url.url,
            short_code: short_url.code,
            created_at: short_url.created_at,
            updated_at: short_url.updated_at,
        }
    }
}

/// Short URL record including how often it was resolved.
#[derive(Debug, Serialize)]
pub struct ShortUrlStatsResponse {
    #[serde(flatten)]
    pub short_url: ShortUrlResponse,
    pub access_count: i64,
}

impl From<ShortUrl> for ShortUrlStatsResponse {
    fn from(short_url: ShortUrl) -> Self {
        let access_count = short_url.access_count;
        Self {
            short_url: short_url.into(),
            access_count,
        }
    }
}
