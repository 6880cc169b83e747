//! Core domain entities.
//!
//! Entities are plain data structures. [`ShortUrl`] only carries pure
//! predicates over its own fields and a given time.
//!
//! # Entity Types
//!
//! - [`ShortUrl`] - A shortened URL owned by a principal, with a deadline
//! - [`OwnerId`] - Opaque identifier of the principal that owns URLs

pub mod short_url;

pub use short_url::{OwnerId, ShortUrl};
