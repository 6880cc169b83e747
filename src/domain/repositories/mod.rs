//! Repository trait definitions for the domain layer.
//!
//! These traits abstract the durable store so services can run against
//! PostgreSQL in production and in-memory or mocked stores in tests.
//!
//! # Available Repositories
//!
//! - [`UrlRepository`] - Short URL storage keyed by alias
//! - [`TokenRepository`] - API token authentication
//!
//! # Testing
//!
//! Mock implementations are auto-generated via `mockall` under `cfg(test)`.
//! See `tests/repository_url.rs` for PostgreSQL-backed checks.

pub mod token_repository;
pub mod url_repository;

pub use token_repository::{ApiToken, TokenRepository};
pub use url_repository::{StoreError, UrlRepository};

#[cfg(test)]
pub use token_repository::MockTokenRepository;
#[cfg(test)]
pub use url_repository::MockUrlRepository;
