//! Short URL entity: a generated code mapped to a target URL.

use chrono::{DateTime, Utc};

/// A shortened URL with its access counter.
#[derive(Debug, Clone)]
pub struct ShortUrl {
    pub id: i64,
    pub code: String,
    pub url: String,
    pub access_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input data for creating a short URL. `access_count` starts at zero.
#[derive(Debug, Clone)]
pub struct NewShortUrl {
    pub code: String,
    pub url: String,
}
