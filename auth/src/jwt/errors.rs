use thiserror::Error;

/// Error type for token operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    #[error("Signing secret too short: got {actual} bytes, need at least {minimum}")]
    SecretTooShort { actual: usize, minimum: usize },

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Failed to decode token: {0}")]
    DecodingFailed(String),

    #[error("Malformed token: expected 3 segments, got {0}")]
    MalformedToken(usize),
}
