use std::fmt;

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::BlockDecryptMut;
use aes::cipher::BlockEncryptMut;
use aes::cipher::KeyIvInit;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::errors::EncryptionError;
use super::PasswordEncryption;

type Aes256CbcEncryptor = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDecryptor = cbc::Decryptor<aes::Aes256>;

const KEY_LENGTH: usize = 32;
const IV_LENGTH: usize = 16;
const BLOCK_SIZE: usize = 16;

/// 256-bit AES key.
///
/// Must be managed separately from the data store; whoever holds both can
/// recover the stored Argon2id hashes.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptionKey([u8; KEY_LENGTH]);

impl EncryptionKey {
    /// Wrap raw key bytes.
    pub fn new(bytes: [u8; KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parse a key from its hex representation.
    ///
    /// # Arguments
    /// * `encoded` - Exactly 64 hex characters
    ///
    /// # Errors
    /// * `InvalidKey` - Not hex, or not 32 bytes once decoded
    pub fn from_hex(encoded: &str) -> Result<Self, EncryptionError> {
        let bytes = hex::decode(encoded.trim())
            .map_err(|e| EncryptionError::InvalidKey(e.to_string()))?;

        let bytes: [u8; KEY_LENGTH] = bytes.try_into().map_err(|bytes: Vec<u8>| {
            EncryptionError::InvalidKey(format!(
                "expected {} bytes, got {}",
                KEY_LENGTH,
                bytes.len()
            ))
        })?;

        Ok(Self(bytes))
    }

    /// Generate a random key from the OS RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LENGTH];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("length", &KEY_LENGTH)
            .finish_non_exhaustive()
    }
}

/// AES-256-CBC encryptor for password hashes at rest.
///
/// Blob format: `base64(iv || ciphertext)` with a fresh 16-byte IV per call
/// and PKCS#7 padding.
#[derive(Debug, Clone)]
pub struct PasswordEncryptor {
    key: EncryptionKey,
}

impl PasswordEncryptor {
    pub fn new(key: EncryptionKey) -> Self {
        Self { key }
    }
}

impl PasswordEncryption for PasswordEncryptor {
    fn encrypt(&self, plaintext: &[u8]) -> String {
        let mut iv = [0u8; IV_LENGTH];
        OsRng.fill_bytes(&mut iv);

        let ciphertext = Aes256CbcEncryptor::new(&self.key.0.into(), &iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

        let mut blob = Vec::with_capacity(IV_LENGTH + ciphertext.len());
        blob.extend_from_slice(&iv);
        blob.extend_from_slice(&ciphertext);

        STANDARD.encode(blob)
    }

    fn decrypt(&self, blob: &str) -> Result<Vec<u8>, EncryptionError> {
        let data = STANDARD
            .decode(blob)
            .map_err(|e| EncryptionError::InvalidEncoding(e.to_string()))?;

        if data.len() < IV_LENGTH + BLOCK_SIZE {
            return Err(EncryptionError::Truncated {
                min: IV_LENGTH + BLOCK_SIZE,
                actual: data.len(),
            });
        }

        let (iv, ciphertext) = data.split_at(IV_LENGTH);
        if ciphertext.len() % BLOCK_SIZE != 0 {
            return Err(EncryptionError::InvalidLength(ciphertext.len()));
        }

        Aes256CbcDecryptor::new_from_slices(&self.key.0, iv)
            .map_err(|e| EncryptionError::InvalidKey(e.to_string()))?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| EncryptionError::DecryptionFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encryptor() -> PasswordEncryptor {
        PasswordEncryptor::new(EncryptionKey::new([7u8; KEY_LENGTH]))
    }

    #[test]
    fn test_encrypt_and_decrypt() {
        let encryptor = encryptor();
        let plaintext = b"$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$ZGlnZXN0";

        let blob = encryptor.encrypt(plaintext);
        let decrypted = encryptor.decrypt(&blob).expect("Failed to decrypt");

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_empty_plaintext_round_trips() {
        let encryptor = encryptor();

        let blob = encryptor.encrypt(b"");
        let decrypted = encryptor.decrypt(&blob).expect("Failed to decrypt");

        assert!(decrypted.is_empty());
    }

    #[test]
    fn test_fresh_iv_per_call() {
        let encryptor = encryptor();

        let first = encryptor.encrypt(b"same input");
        let second = encryptor.encrypt(b"same input");

        assert_ne!(first, second);
    }

    #[test]
    fn test_blob_layout_is_iv_then_padded_ciphertext() {
        let encryptor = encryptor();

        let blob = encryptor.encrypt(b"exactly 16 bytes");
        let raw = STANDARD.decode(blob).expect("Blob is not base64");

        // A full block of input gains a full block of padding.
        assert_eq!(raw.len(), IV_LENGTH + 2 * BLOCK_SIZE);
    }

    #[test]
    fn test_decrypt_with_wrong_key_fails() {
        let blob = encryptor().encrypt(b"a secret argon2 hash value");
        let other = PasswordEncryptor::new(EncryptionKey::new([9u8; KEY_LENGTH]));

        match other.decrypt(&blob) {
            Err(EncryptionError::DecryptionFailed) => {}
            Ok(plaintext) => assert_ne!(plaintext, b"a secret argon2 hash value"),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decrypt_rejects_non_base64() {
        let result = encryptor().decrypt("not base64 at all!");
        assert!(matches!(result, Err(EncryptionError::InvalidEncoding(_))));
    }

    #[test]
    fn test_decrypt_rejects_truncated_blob() {
        let blob = STANDARD.encode([0u8; IV_LENGTH]);
        let result = encryptor().decrypt(&blob);
        assert!(matches!(result, Err(EncryptionError::Truncated { .. })));
    }

    #[test]
    fn test_decrypt_rejects_partial_block() {
        let blob = STANDARD.encode([0u8; IV_LENGTH + BLOCK_SIZE + 3]);
        let result = encryptor().decrypt(&blob);
        assert!(matches!(result, Err(EncryptionError::InvalidLength(19))));
    }

    #[test]
    fn test_key_from_hex() {
        let key = EncryptionKey::from_hex(&"ab".repeat(KEY_LENGTH)).expect("Valid key");
        assert_eq!(key, EncryptionKey::new([0xab; KEY_LENGTH]));

        assert!(matches!(
            EncryptionKey::from_hex("abcd"),
            Err(EncryptionError::InvalidKey(_))
        ));
        assert!(matches!(
            EncryptionKey::from_hex(&"zz".repeat(KEY_LENGTH)),
            Err(EncryptionError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_key_debug_hides_material() {
        let key = EncryptionKey::new([0xab; KEY_LENGTH]);
        assert!(!format!("{key:?}").contains("171"));
    }
}
