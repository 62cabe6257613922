use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Token payload.
///
/// Serialized as `{"identityId": .., "email": .., "exp": ..}` with `exp` in
/// Unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    #[serde(rename = "identityId")]
    pub identity_id: String,

    pub email: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl TokenClaims {
    /// Create claims that expire `ttl` from now.
    pub fn for_identity(identity_id: impl ToString, email: impl ToString, ttl: Duration) -> Self {
        Self {
            identity_id: identity_id.to_string(),
            email: email.to_string(),
            exp: (Utc::now() + ttl).timestamp(),
        }
    }

    /// A token is expired once the current time reaches `exp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }
}
