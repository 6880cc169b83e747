//! Utility functions for alias derivation, time and database error handling.
//!
//! # Modules
//!
//! - [`alias_encoder`] - Deterministic digest-window alias derivation
//! - [`clock`] - Wall clock and manually driven clock
//! - [`db_error`] - PostgreSQL error classification

pub mod alias_encoder;
pub mod clock;
pub mod db_error;

pub use alias_encoder::{AliasEncoder, EncodeError, Sha256Encoder};
pub use clock::{Clock, ManualClock, SystemClock};
