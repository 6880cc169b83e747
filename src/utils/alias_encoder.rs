//! Deterministic alias derivation.
//!
//! An alias is a window over a printable encoding of
//! `SHA-256(original ++ owner)`. The digest is hex-encoded and the hex text is
//! then encoded with the standard base64 alphabet without padding, which gives
//! an 86 character string. Because the input to base64 is hex text, the
//! output never contains `+` or `/`, so every window is safe in a URL path.
//!
//! Retry `attempt` selects the non-overlapping window starting at
//! `attempt * length`. Once a window would run past the end of the encoding
//! the alias space for that input is exhausted.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use sha2::{Digest, Sha256};

use crate::domain::entities::OwnerId;

/// Errors produced while deriving an alias.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// The requested window runs past the end of the encoded digest.
    /// Callers must stop retrying.
    #[error(
        "cannot generate alias of length {length} at attempt {attempt}: only {available} encoded characters"
    )]
    AliasSpaceExhausted {
        attempt: usize,
        length: usize,
        available: usize,
    },

    #[error("alias length must be greater than zero")]
    InvalidLength,
}

/// Turns (original, owner, attempt, length) into a candidate alias.
///
/// Implementations must be pure: same inputs, same alias.
pub trait AliasEncoder: Send + Sync {
    fn encode(
        &self,
        original: &str,
        owner: &OwnerId,
        attempt: usize,
        length: usize,
    ) -> Result<String, EncodeError>;
}

/// SHA-256 based [`AliasEncoder`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Encoder;

impl Sha256Encoder {
    /// Length of the printable digest encoding every window is cut from.
    pub const ENCODED_LEN: usize = 86;

    pub fn new() -> Self {
        Self
    }

    /// Number of distinct windows available for aliases of `length`.
    pub fn max_attempts(length: usize) -> usize {
        if length == 0 || length > Self::ENCODED_LEN {
            return 0;
        }
        (Self::ENCODED_LEN - length) / length + 1
    }

    fn encoded_digest(original: &str, owner: &OwnerId) -> String {
        let mut hasher = Sha256::new();
        hasher.update(original.as_bytes());
        hasher.update(owner.as_str().as_bytes());
        let hex_digest = hex::encode(hasher.finalize());

        STANDARD_NO_PAD.encode(hex_digest)
    }
}

impl AliasEncoder for Sha256Encoder {
    fn encode(
        &self,
        original: &str,
        owner: &OwnerId,
        attempt: usize,
        length: usize,
    ) -> Result<String, EncodeError> {
        if length == 0 {
            return Err(EncodeError::InvalidLength);
        }

        let encoded = Self::encoded_digest(original, owner);
        let exhausted = EncodeError::AliasSpaceExhausted {
            attempt,
            length,
            available: encoded.len(),
        };

        let Some(start) = attempt.checked_mul(length) else {
            return Err(exhausted);
        };
        let Some(end) = start.checked_add(length) else {
            return Err(exhausted);
        };
        if end > encoded.len() {
            return Err(exhausted);
        }

        Ok(encoded[start..end].to_string())
    }
}
