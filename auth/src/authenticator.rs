use std::fmt;
use std::sync::Arc;

use crate::encryption::EncryptionError;
use crate::encryption::EncryptionKey;
use crate::encryption::PasswordEncryption;
use crate::encryption::PasswordEncryptor;
use crate::jwt::JwtError;
use crate::jwt::TokenClaims;
use crate::jwt::TokenManager;
use crate::lockout::normalize_identity;
use crate::lockout::AttemptGuard;
use crate::lockout::IdentityLocked;
use crate::lockout::LockoutTracker;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::password::PasswordHashing;
use crate::store::CredentialStore;
use crate::store::StoreError;

/// Well-formed Argon2id hash that matches no password. Verified against when
/// the identity is unknown so that path costs the same as a wrong password.
const UNKNOWN_IDENTITY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Outcome of a successful authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    successful: bool,
    token: String,
    identity_id: String,
    email: String,
}

impl AuthenticationResult {
    fn success(token: String, identity_id: String, email: String) -> Self {
        Self {
            successful: true,
            token,
            identity_id,
            email,
        }
    }

    pub fn is_successful(&self) -> bool {
        self.successful
    }

    /// Signed bearer token
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn identity_id(&self) -> &str {
        &self.identity_id
    }

    /// Email as registered, not as typed at login.
    pub fn email(&self) -> &str {
        &self.email
    }
}

impl fmt::Debug for AuthenticationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticationResult")
            .field("successful", &self.successful)
            .field("identity_id", &self.identity_id)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Authentication operation errors.
///
/// Unknown identities and wrong passwords both surface as
/// `InvalidCredentials` so responses never reveal which emails exist.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Account temporarily locked")]
    AccountLocked,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Stored credential cannot be decrypted: {0}")]
    CorruptCredential(#[from] EncryptionError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] JwtError),
}

/// Authentication coordinator.
///
/// Combines the lockout table, the credential store, decryption of the
/// stored hash, password verification and token issuance into a single
/// `authenticate` operation.
pub struct AuthenticationService<S, H = PasswordHasher, E = PasswordEncryptor>
where
    S: CredentialStore,
    H: PasswordHashing,
    E: PasswordEncryption,
{
    store: Arc<S>,
    hasher: H,
    encryptor: E,
    tokens: Arc<TokenManager>,
    lockout: Arc<LockoutTracker>,
}

impl<S> AuthenticationService<S>
where
    S: CredentialStore,
{
    /// Create an authentication service with Argon2id hashing and
    /// AES-256-CBC encryption at rest.
    ///
    /// # Arguments
    /// * `store` - Credential lookup
    /// * `encryption_key` - Key wrapping stored hashes, kept apart from the store
    /// * `tokens` - Shared token manager
    /// * `lockout` - Shared lockout table
    pub fn new(
        store: Arc<S>,
        encryption_key: EncryptionKey,
        tokens: Arc<TokenManager>,
        lockout: Arc<LockoutTracker>,
    ) -> Self {
        Self::with_components(
            store,
            PasswordHasher::new(),
            PasswordEncryptor::new(encryption_key),
            tokens,
            lockout,
        )
    }
}

impl<S, H, E> AuthenticationService<S, H, E>
where
    S: CredentialStore,
    H: PasswordHashing,
    E: PasswordEncryption,
{
    pub fn with_components(
        store: Arc<S>,
        hasher: H,
        encryptor: E,
        tokens: Arc<TokenManager>,
        lockout: Arc<LockoutTracker>,
    ) -> Self {
        Self {
            store,
            hasher,
            encryptor,
            tokens,
            lockout,
        }
    }

    /// Verify credentials and issue a token.
    ///
    /// # Arguments
    /// * `email` - Identity, matched case-insensitively
    /// * `password` - Plaintext password to verify
    ///
    /// # Returns
    /// AuthenticationResult with token and identity claims
    ///
    /// # Errors
    /// * `AccountLocked` - Too many failed attempts; the store is not consulted
    /// * `InvalidCredentials` - Unknown identity or wrong password
    /// * `Store` - Credential store failed
    /// * `CorruptCredential` - Stored blob does not decrypt with the configured key
    /// * `Token` - Token generation failed
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let identity = normalize_identity(email);

        // Held until settled; store and decryption errors release it uncounted.
        let attempt = match self.lockout.begin_attempt(&identity) {
            Ok(attempt) => attempt,
            Err(IdentityLocked) => {
                tracing::warn!(identity = %identity, "Authentication refused: identity locked");
                return Err(AuthenticationError::AccountLocked);
            }
        };

        let record = match self.store.find_credential_by_email(&identity).await? {
            Some(record) => record,
            None => {
                self.hasher.verify(password, UNKNOWN_IDENTITY_HASH);
                return Err(self.reject(attempt));
            }
        };

        let stored_hash = self
            .encryptor
            .decrypt(&record.encrypted_hash)
            .map_err(|e| {
                tracing::error!(
                    identity_id = %record.identity_id,
                    error = %e,
                    "Stored credential cannot be decrypted"
                );
                AuthenticationError::CorruptCredential(e)
            })?;

        if !self
            .hasher
            .verify(password, &String::from_utf8_lossy(&stored_hash))
        {
            return Err(self.reject(attempt));
        }

        attempt.succeed();

        let token = self.tokens.issue(&record.identity_id, &record.email)?;

        tracing::info!(identity_id = %record.identity_id, "Authentication succeeded");

        Ok(AuthenticationResult::success(
            token,
            record.identity_id,
            record.email,
        ))
    }

    /// Hash then encrypt a password for storage.
    ///
    /// # Errors
    /// * `Password` - Hashing failed
    pub fn seal_password(&self, password: &str) -> Result<String, AuthenticationError> {
        let hash = self.hasher.hash(password)?;
        Ok(self.encryptor.encrypt(hash.as_bytes()))
    }

    /// Issue a token without checking a password.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token(&self, identity_id: &str, email: &str) -> Result<String, JwtError> {
        self.tokens.issue(identity_id, email)
    }

    pub fn verify_token(&self, token: &str) -> bool {
        self.tokens.verify(token)
    }

    pub fn verified_claims(&self, token: &str) -> Option<TokenClaims> {
        self.tokens.verified_claims(token)
    }

    pub fn failed_attempts(&self, email: &str) -> u32 {
        self.lockout.failed_attempts(email)
    }

    pub fn lockout(&self) -> &LockoutTracker {
        &self.lockout
    }

    fn reject(&self, attempt: AttemptGuard<'_>) -> AuthenticationError {
        let identity = attempt.identity().to_string();
        let failed_attempts = attempt.fail();
        tracing::warn!(
            identity = %identity,
            failed_attempts,
            "Authentication failed: invalid credentials"
        );
        AuthenticationError::InvalidCredentials
    }
}
