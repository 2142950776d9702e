//! Short code generation with guaranteed per-call uniqueness.
//!
//! [`CodeGenerator`] draws codes uniformly from a URL-safe alphabet and asks an
//! injected existence check whether each draw is already taken. Collisions are
//! retried with a fresh draw up to a fixed budget, after which the call fails
//! with [`AppError::Exhausted`].
//!
//! The in-process loop narrows, but does not close, the window between the
//! check and the insert. Storage must still enforce uniqueness on the code
//! column; see [`crate::domain::repositories::ShortUrlRepository::create`].

use std::collections::HashSet;
use std::future::Future;

use rand::Rng;
use serde_json::json;

use crate::error::AppError;

/// Default alphabet: ASCII letters and digits.
pub const DEFAULT_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Default code length. With the default alphabet this gives 62^6 ≈ 5.7e10 codes.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Default number of draws before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// Codes that collide with top-level routes and can never be resolved.
pub const RESERVED_CODES: &[&str] = &["api", "health"];

/// Returns true if `code` shadows a fixed route.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// Characters that never need percent-encoding in a URL path (RFC 3986 unreserved).
fn is_url_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}

/// Random short code generator.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    alphabet: Vec<char>,
    length: usize,
    max_attempts: usize,
}

impl CodeGenerator {
    /// Creates a generator.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if:
    /// - `alphabet` is empty, contains duplicates or non URL-safe characters
    /// - `length` is zero
    /// - `max_attempts` is zero
    pub fn new(alphabet: &str, length: usize, max_attempts: usize) -> Result<Self, AppError> {
        let chars: Vec<char> = alphabet.chars().collect();

        if chars.is_empty() {
            return Err(AppError::bad_request(
                "Code alphabet must not be empty",
                json!({}),
            ));
        }

        if let Some(bad) = chars.iter().find(|c| !is_url_safe(**c)) {
            return Err(AppError::bad_request(
                "Code alphabet must only contain URL-safe characters",
                json!({ "character": bad.to_string() }),
            ));
        }

        let unique: HashSet<char> = chars.iter().copied().collect();
        if unique.len() != chars.len() {
            // Duplicates would skew the distribution.
            return Err(AppError::bad_request(
                "Code alphabet must not contain duplicate characters",
                json!({ "alphabet": alphabet }),
            ));
        }

        if length == 0 {
            return Err(AppError::bad_request(
                "Code length must be at least 1",
                json!({}),
            ));
        }

        if max_attempts == 0 {
            return Err(AppError::bad_request(
                "Code generation needs at least one attempt",
                json!({}),
            ));
        }

        Ok(Self {
            alphabet: chars,
            length,
            max_attempts,
        })
    }

    /// Draws a single code without any uniqueness check.
    pub fn draw(&self) -> String {
        let mut rng = rand::rng();

        (0..self.length)
            .map(|_| self.alphabet[rng.random_range(0..self.alphabet.len())])
            .collect()
    }

    /// Generates a code for which `exists` reports `false`.
    ///
    /// `exists` is typically backed by the storage layer. Its errors are
    /// propagated unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Exhausted`] after `max_attempts` consecutive
    /// collisions, which signals a saturated namespace or a misbehaving
    /// existence check.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let generator = CodeGenerator::default();
    /// let code = generator
    ///     .generate(|code| async move { repository.code_exists(&code).await })
    ///     .await?;
    /// ```
    pub async fn generate<F, Fut>(&self, mut exists: F) -> Result<String, AppError>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<bool, AppError>>,
    {
        for attempt in 1..=self.max_attempts {
            let code = self.draw();

            if !exists(code.clone()).await? {
                return Ok(code);
            }

            tracing::warn!(attempt, max_attempts = self.max_attempts, "Short code collision");
        }

        Err(AppError::exhausted(
            "Failed to generate unique code",
            json!({
                "reason": "Too many collisions",
                "attempts": self.max_attempts,
            }),
        ))
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self {
            alphabet: DEFAULT_ALPHABET.chars().collect(),
            length: DEFAULT_CODE_LENGTH,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}
