pub mod argon2;
pub mod errors;

pub use self::argon2::PasswordHasher;
pub use errors::PasswordError;

/// One-way password hashing capability.
///
/// Kept behind a trait so the hashing algorithm can be replaced without
/// touching the authentication flow.
pub trait PasswordHashing: Send + Sync + 'static {
    /// Hash a plaintext password into a self-describing string.
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Check a plaintext password against a stored hash.
    ///
    /// Fails closed: a malformed or foreign hash yields `false`.
    fn verify(&self, password: &str, hash: &str) -> bool;
}
