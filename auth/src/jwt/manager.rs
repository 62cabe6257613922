use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::TokenClaims;
use super::errors::JwtError;

const TOKEN_TYPE: &str = "token";
const SEGMENT_COUNT: usize = 3;

/// Issues and verifies signed, time-bounded bearer tokens.
///
/// Tokens are `header.payload.signature`, each segment base64url without
/// padding, signed with HMAC-SHA256 over `header.payload`. The secret is
/// fixed at construction and never mutated afterwards, so one manager can be
/// shared behind an `Arc` by every request handler.
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    default_ttl: Duration,
}

impl TokenManager {
    /// Minimum signing secret length in bytes (256 bits)
    pub const MIN_SECRET_LENGTH: usize = 32;

    /// Lifetime of tokens issued without an explicit TTL.
    pub const DEFAULT_TTL_SECONDS: i64 = 3600;

    /// Create a token manager from a shared signing secret.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens. Every instance that must
    ///   accept the same tokens needs the same secret.
    ///
    /// # Errors
    /// * `SecretTooShort` - Secret is shorter than 32 bytes
    pub fn new(secret: &[u8]) -> Result<Self, JwtError> {
        if secret.len() < Self::MIN_SECRET_LENGTH {
            return Err(JwtError::SecretTooShort {
                actual: secret.len(),
                minimum: Self::MIN_SECRET_LENGTH,
            });
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            default_ttl: Duration::seconds(Self::DEFAULT_TTL_SECONDS),
        })
    }

    /// Override the lifetime used by [`TokenManager::issue`].
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issue a token for an identity using the default TTL.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, identity_id: &str, email: &str) -> Result<String, JwtError> {
        self.issue_with_ttl(identity_id, email, self.default_ttl)
    }

    /// Issue a token that expires `ttl` from now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue_with_ttl(
        &self,
        identity_id: &str,
        email: &str,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let claims = TokenClaims::for_identity(identity_id, email, ttl);

        let mut header = Header::new(self.algorithm);
        header.typ = Some(TOKEN_TYPE.to_string());

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode the payload without checking signature or expiry.
    ///
    /// # Errors
    /// * `MalformedToken` - Token does not have exactly 3 segments
    /// * `DecodingFailed` - Payload is not base64url-encoded claims JSON
    ///
    /// # Security Warning
    /// For inspection only. Never base an authorization decision on claims
    /// returned here; use [`TokenManager::verified_claims`] instead.
    pub fn decode_payload(&self, token: &str) -> Result<TokenClaims, JwtError> {
        let segments = token.split('.').count();
        if segments != SEGMENT_COUNT {
            return Err(JwtError::MalformedToken(segments));
        }

        let mut validation = Validation::new(self.algorithm);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| JwtError::DecodingFailed(e.to_string()))
    }

    /// Check signature and expiry.
    ///
    /// Every rejection (segment count, signature, payload, expiry) is a plain
    /// `false`; invalid tokens are routine input at the API boundary.
    pub fn verify(&self, token: &str) -> bool {
        self.verified_claims(token).is_some()
    }

    /// Claims of a token that passes [`TokenManager::verify`].
    pub fn verified_claims(&self, token: &str) -> Option<TokenClaims> {
        let segments = token.split('.').count();
        if segments != SEGMENT_COUNT {
            tracing::debug!(segments, "Rejecting token with wrong segment count");
            return None;
        }

        // Expiry is checked below: `exp` equal to now already counts as expired.
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        // The HMAC comparison inside `jsonwebtoken` is constant-time.
        let claims = match decode::<TokenClaims>(token, &self.decoding_key, &validation) {
            Ok(data) => data.claims,
            Err(e) => {
                tracing::debug!(error = %e, "Rejecting token");
                return None;
            }
        };

        if claims.is_expired(Utc::now().timestamp()) {
            tracing::debug!(exp = claims.exp, "Rejecting expired token");
            return None;
        }

        Some(claims)
    }
}
