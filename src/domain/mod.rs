//! Domain layer containing business entities and storage contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//!
//! # Design Principles
//!
//! - The domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by the infrastructure layer
//! - Business logic lives in services (see [`crate::application::services`])
//!
//! # Request Flow
//!
//! 1. HTTP handler validates the DTO
//! 2. Protected routes resolve the caller via
//!    [`crate::application::services::SessionService::verify_access_token`]
//! 3. A service applies the business rules
//! 4. The service persists through a repository trait

pub mod entities;
pub mod repositories;
