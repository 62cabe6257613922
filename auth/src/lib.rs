//! Credential security library
//!
//! Provides the authentication core for the allowance service:
//! - Password hashing (Argon2id)
//! - Encryption of stored hashes at rest (AES-256-CBC)
//! - Signed bearer tokens (HS256)
//! - Failed-login lockout
//! - Authentication coordination over a pluggable credential store
//!
//! Hashing and encryption sit behind the [`PasswordHashing`] and
//! [`PasswordEncryption`] traits so either algorithm can be swapped without
//! touching [`AuthenticationService`].
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::{PasswordHasher, PasswordHashing};
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! ```
//!
//! ## Encryption at Rest
//! ```
//! use auth::{EncryptionKey, PasswordEncryption, PasswordEncryptor};
//!
//! let encryptor = PasswordEncryptor::new(EncryptionKey::generate());
//! let blob = encryptor.encrypt(b"$argon2id$...");
//! assert_eq!(encryptor.decrypt(&blob).unwrap(), b"$argon2id$...");
//! ```
//!
//! ## Tokens
//! ```
//! use auth::TokenManager;
//!
//! let tokens = TokenManager::new(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let token = tokens.issue("user123", "alice@example.com").unwrap();
//! assert!(tokens.verify(&token));
//! ```

pub mod authenticator;
pub mod encryption;
pub mod jwt;
pub mod lockout;
pub mod password;
pub mod store;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::AuthenticationService;
pub use encryption::EncryptionError;
pub use encryption::EncryptionKey;
pub use encryption::PasswordEncryption;
pub use encryption::PasswordEncryptor;
pub use jwt::JwtError;
pub use jwt::TokenClaims;
pub use jwt::TokenManager;
pub use lockout::LockoutPolicy;
pub use lockout::LockoutTracker;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::PasswordHashing;
pub use store::CredentialRecord;
pub use store::CredentialStore;
pub use store::StoreError;
