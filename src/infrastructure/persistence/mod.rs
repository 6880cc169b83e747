//! Repository implementations.
//!
//! PostgreSQL implementations use SQLx runtime queries mapped through
//! `FromRow`. In-memory implementations serve local runs and tests.
//!
//! # Repositories
//!
//! - [`PgUrlRepository`] / [`MemoryUrlRepository`] - Short URL storage
//! - [`PgTokenRepository`] / [`MemoryTokenRepository`] - API token storage

pub mod memory_token_repository;
pub mod memory_url_repository;
pub mod pg_token_repository;
pub mod pg_url_repository;

pub use memory_token_repository::MemoryTokenRepository;
pub use memory_url_repository::MemoryUrlRepository;
pub use pg_token_repository::PgTokenRepository;
pub use pg_url_repository::PgUrlRepository;
