pub mod aes_cbc;
pub mod errors;

pub use aes_cbc::EncryptionKey;
pub use aes_cbc::PasswordEncryptor;
pub use errors::EncryptionError;

/// Reversible encryption of stored password hashes.
///
/// Kept behind a trait so the cipher can be replaced without touching the
/// authentication flow.
pub trait PasswordEncryption: Send + Sync + 'static {
    /// Encrypt bytes into a self-contained text blob.
    fn encrypt(&self, plaintext: &[u8]) -> String;

    /// Reverse [`PasswordEncryption::encrypt`].
    ///
    /// # Errors
    /// Tampered, truncated or foreign input is rejected with an
    /// [`EncryptionError`] rather than returning garbage.
    fn decrypt(&self, blob: &str) -> Result<Vec<u8>, EncryptionError>;
}
