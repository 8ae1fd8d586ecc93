//! Per-submission idempotency token.

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error returned when a client-supplied token is not a UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("idempotency key must be a UUID")]
pub struct IdempotencyKeyError;

/// Identifies one submission attempt.
///
/// The contact form mints a fresh key each time it renders an empty form and
/// re-sends the same key when the visitor retries after a failure. The intake
/// endpoint and the store both refuse to create a second row for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyKey(Uuid);

impl IdempotencyKey {
    /// Mint a new random key.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a client-supplied key.
    ///
    /// # Errors
    ///
    /// Returns [`IdempotencyKeyError`] if the trimmed input is not a UUID.
    pub fn parse(s: &str) -> Result<Self, IdempotencyKeyError> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| IdempotencyKeyError)
    }

    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for IdempotencyKey {
    type Err = IdempotencyKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_keys_differ() {
        assert_ne!(IdempotencyKey::generate(), IdempotencyKey::generate());
    }

    #[test]
    fn test_parse_roundtrips_display() {
        let key = IdempotencyKey::generate();
        assert_eq!(IdempotencyKey::parse(&key.to_string()).unwrap(), key);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(IdempotencyKey::parse("not-a-uuid"), Err(IdempotencyKeyError));
        assert_eq!(IdempotencyKey::parse(""), Err(IdempotencyKeyError));
    }
}
