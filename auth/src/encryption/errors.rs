use thiserror::Error;

/// Error type for encryption-at-rest operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncryptionError {
    #[error("Invalid encryption key: {0}")]
    InvalidKey(String),

    #[error("Encrypted data is not valid base64: {0}")]
    InvalidEncoding(String),

    #[error("Encrypted data too short: expected at least {min} bytes, got {actual}")]
    Truncated { min: usize, actual: usize },

    #[error("Ciphertext length {0} is not a multiple of the block size")]
    InvalidLength(usize),

    #[error("Decryption failed: wrong key or tampered data")]
    DecryptionFailed,
}
