//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! caching and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::url_service::UrlService`] - Short URL lifecycle (create, resolve, prolong, delete)
//! - [`services::auth_service::AuthService`] - API token authentication

pub mod services;
