use async_trait::async_trait;
use thiserror::Error;

/// Stored credential for one identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub identity_id: String,
    pub email: String,
    /// Encrypted Argon2id hash, as produced by `AuthenticationService::seal_password`.
    pub encrypted_hash: String,
}

/// Failure of the backing user store.
///
/// Never a credential error: callers must surface it as an outage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Credential store unavailable: {0}")]
    Unavailable(String),
}

/// Lookup port onto the user store.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Find the credential registered under an email.
    ///
    /// # Arguments
    /// * `email` - Email address, matched case-insensitively
    ///
    /// # Returns
    /// Optional credential record (None if no identity uses this email)
    ///
    /// # Errors
    /// * `Unavailable` - Store could not be queried
    async fn find_credential_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CredentialRecord>, StoreError>;
}
