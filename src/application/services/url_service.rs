//! Short URL creation, resolution and maintenance.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::{NewShortUrl, ShortUrl};
use crate::domain::repositories::ShortUrlRepository;
use crate::error::AppError;
use crate::utils::code_generator::{CodeGenerator, is_reserved};
use crate::utils::url_validator::{UrlValidationError, validate_target_url};

/// How many times a code may lose the race between the existence check and
/// the insert before shortening gives up.
const INSERT_ATTEMPTS: usize = 3;

fn url_not_found(code: &str) -> AppError {
    AppError::not_found("Url not found", json!({ "code": code }))
}

fn validated_url(url: &str) -> Result<String, AppError> {
    validate_target_url(url).map_err(|e| match e {
        UrlValidationError::Empty => AppError::bad_request(e.to_string(), json!({ "field": "url" })),
        _ => AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() })),
    })
}

/// A code is taken if it is stored or shadows a fixed route.
async fn code_taken<R: ShortUrlRepository + ?Sized>(
    repository: &R,
    code: &str,
) -> Result<bool, AppError> {
    if is_reserved(code) {
        return Ok(true);
    }

    repository.code_exists(code).await
}

/// Service for short URLs.
///
/// Codes come from the [`CodeGenerator`], checked against the repository.
/// A unique violation on insert means another request took the code in the
/// meantime; the service then draws again.
pub struct UrlService<R: ShortUrlRepository + ?Sized> {
    repository: Arc<R>,
    generator: CodeGenerator,
}

impl<R: ShortUrlRepository + ?Sized> UrlService<R> {
    pub fn new(repository: Arc<R>, generator: CodeGenerator) -> Self {
        Self {
            repository,
            generator,
        }
    }

    /// Creates a short URL for `url` under a freshly generated code.
    ///
    /// The same target may be shortened any number of times; each call gets
    /// its own code.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if `url` is not an absolute http(s) URL
    /// - [`AppError::Exhausted`] if no free code could be found
    pub async fn shorten(&self, url: &str) -> Result<ShortUrl, AppError> {
        let url = validated_url(url)?;

        for attempt in 1..=INSERT_ATTEMPTS {
            let repository = &self.repository;
            let code = self
                .generator
                .generate(move |code| async move { code_taken(repository.as_ref(), &code).await })
                .await?;

            match self
                .repository
                .create(NewShortUrl {
                    code,
                    url: url.clone(),
                })
                .await
            {
                Ok(short_url) => {
                    tracing::info!(code = %short_url.code, "Short URL created");
                    return Ok(short_url);
                }
                Err(AppError::Conflict { .. }) => {
                    tracing::warn!(attempt, "Short code taken between check and insert");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::exhausted(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions" }),
        ))
    }

    /// Returns the record for `code` and counts the access.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown.
    pub async fn resolve(&self, code: &str) -> Result<ShortUrl, AppError> {
        self.repository
            .increment_access_count(code, 1)
            .await?
            .ok_or_else(|| url_not_found(code))
    }

    /// Returns the record for `code` without counting the access.
    pub async fn stats(&self, code: &str) -> Result<ShortUrl, AppError> {
        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| url_not_found(code))
    }

    /// Points an existing code at a new target.
    pub async fn update(&self, code: &str, url: &str) -> Result<ShortUrl, AppError> {
        let url = validated_url(url)?;

        let updated = self
            .repository
            .update_url(code, &url)
            .await?
            .ok_or_else(|| url_not_found(code))?;

        tracing::info!(code, "Short URL updated");
        Ok(updated)
    }

    pub async fn delete(&self, code: &str) -> Result<(), AppError> {
        if !self.repository.delete(code).await? {
            return Err(url_not_found(code));
        }

        tracing::info!(code, "Short URL deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockShortUrlRepository;
    use chrono::Utc;

    fn create_test_short_url(code: &str, url: &str, access_count: i64) -> ShortUrl {
        ShortUrl {
            id: 1,
            code: code.to_string(),
            url: url.to_string(),
            access_count,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(repo: MockShortUrlRepository) -> UrlService<MockShortUrlRepository> {
        UrlService::new(Arc::new(repo), CodeGenerator::default())
    }

    #[tokio::test]
    async fn test_route_names_count_as_taken() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_code_exists().times(0);

        assert!(code_taken(&repo, "health").await.unwrap());
        assert!(code_taken(&repo, "api").await.unwrap());
    }

    #[tokio::test]
    async fn test_other_codes_ask_storage() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_code_exists()
            .withf(|code| code == "aB3xY9")
            .times(1)
            .returning(|_| Ok(false));

        assert!(!code_taken(&repo, "aB3xY9").await.unwrap());
    }

    #[tokio::test]
    async fn test_shorten_success() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_code_exists().times(1).returning(|_| Ok(false));
        repo.expect_create()
            .withf(|new| new.url == "https://example.com/page" && new.code.len() == 6)
            .times(1)
            .returning(|new| Ok(create_test_short_url(&new.code, &new.url, 0)));

        let short_url = service(repo)
            .shorten("  https://example.com/page ")
            .await
            .unwrap();

        assert_eq!(short_url.url, "https://example.com/page");
        assert_eq!(short_url.access_count, 0);
    }

    #[tokio::test]
    async fn test_shorten_invalid_url() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_code_exists().times(0);
        repo.expect_create().times(0);

        let service = service(repo);
        for url in ["", "not a url", "ftp://example.com"] {
            assert!(matches!(
                service.shorten(url).await,
                Err(AppError::Validation { .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_shorten_empty_url_message() {
        let err = service(MockShortUrlRepository::new())
            .shorten("   ")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Url is required");
    }

    #[tokio::test]
    async fn test_shorten_retries_when_insert_conflicts() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_code_exists().times(2).returning(|_| Ok(false));

        let mut seq = mockall::Sequence::new();
        repo.expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(AppError::conflict("Unique constraint violation", json!({}))));
        repo.expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|new| Ok(create_test_short_url(&new.code, &new.url, 0)));

        assert!(service(repo).shorten("https://example.com").await.is_ok());
    }

    #[tokio::test]
    async fn test_shorten_exhausted_when_inserts_keep_conflicting() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_code_exists().returning(|_| Ok(false));
        repo.expect_create()
            .times(INSERT_ATTEMPTS)
            .returning(|_| Err(AppError::conflict("Unique constraint violation", json!({}))));

        assert!(matches!(
            service(repo).shorten("https://example.com").await,
            Err(AppError::Exhausted { .. })
        ));
    }

    #[tokio::test]
    async fn test_shorten_exhausted_when_every_code_exists() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_code_exists().returning(|_| Ok(true));
        repo.expect_create().times(0);

        let service = UrlService::new(
            Arc::new(repo),
            CodeGenerator::new("ab", 1, 4).unwrap(),
        );

        let err = service.shorten("https://example.com").await.unwrap_err();
        assert!(matches!(err, AppError::Exhausted { .. }));
        assert_eq!(err.to_string(), "Failed to generate unique code");
    }

    #[tokio::test]
    async fn test_shorten_propagates_storage_errors() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_code_exists()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        assert!(matches!(
            service(repo).shorten("https://example.com").await,
            Err(AppError::Internal { .. })
        ));
    }

    #[tokio::test]
    async fn test_resolve_counts_access() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_increment_access_count()
            .withf(|code, delta| code == "abc123" && *delta == 1)
            .times(1)
            .returning(|code, _| Ok(Some(create_test_short_url(code, "https://example.com", 1))));

        let short_url = service(repo).resolve("abc123").await.unwrap();
        assert_eq!(short_url.access_count, 1);
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_increment_access_count()
            .returning(|_, _| Ok(None));

        let err = service(repo).resolve("nope").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
        assert_eq!(err.to_string(), "Url not found");
    }

    #[tokio::test]
    async fn test_stats_does_not_count() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_increment_access_count().times(0);
        repo.expect_find_by_code()
            .times(1)
            .returning(|code| Ok(Some(create_test_short_url(code, "https://example.com", 7))));

        assert_eq!(service(repo).stats("abc123").await.unwrap().access_count, 7);
    }

    #[tokio::test]
    async fn test_update_validates_before_storage() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_update_url().times(0);

        assert!(matches!(
            service(repo).update("abc123", "javascript:alert(1)").await,
            Err(AppError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_update_url().returning(|_, _| Ok(None));

        assert!(matches!(
            service(repo).update("abc123", "https://example.org").await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_delete()
            .withf(|code| code == "abc123")
            .returning(|_| Ok(true));
        repo.expect_delete()
            .withf(|code| code != "abc123")
            .returning(|_| Ok(false));

        let service = service(repo);
        assert!(service.delete("abc123").await.is_ok());
        assert!(matches!(
            service.delete("other").await,
            Err(AppError::NotFound { .. })
        ));
    }
}
