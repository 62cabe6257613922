use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::user::errors::EmailError;
use crate::user::errors::NameError;
use crate::user::errors::PasswordPolicyError;
use crate::user::errors::UserIdError;

/// User aggregate entity.
///
/// Represents a registered parent or teenager. Only the sealed (hashed, then
/// encrypted) password is ever held.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: EmailAddress,
    pub encrypted_password: String,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    ///
    /// # Returns
    /// UserId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// First or last name. Must not be blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    /// Create a validated name.
    ///
    /// # Arguments
    /// * `field` - Field label used in the error message
    /// * `name` - Raw name
    ///
    /// # Errors
    /// * `Empty` - Name is empty or whitespace only
    pub fn new(field: &'static str, name: String) -> Result<Self, NameError> {
        if name.trim().is_empty() {
            Err(NameError::Empty(field))
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Email address type
///
/// Validates RFC 5322 format and additionally restricts the local part to
/// letters, digits, `.`, `_` and `-`. Comparisons elsewhere go through
/// [`EmailAddress::normalized`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    /// * `InvalidCharacters` - Local part has characters outside `[A-Za-z0-9._-]`
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))?;

        let local_part = email.split('@').next().unwrap_or_default();
        if !local_part
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return Err(EmailError::InvalidCharacters);
        }

        Ok(Self(email))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-cased form used for lookups.
    pub fn normalized(&self) -> String {
        auth::lockout::normalize_identity(&self.0)
    }
}

/// Plaintext password that passed the strength policy.
///
/// Lives only for the duration of a registration request.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 8;

    /// Validate a password against the strength policy.
    ///
    /// # Errors
    /// * `TooShort` - Fewer than 8 characters
    /// * `MissingUppercase` / `MissingLowercase` / `MissingDigit` /
    ///   `MissingSpecialCharacter` - Required character class absent
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(PasswordPolicyError::MissingUppercase);
        }
        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(PasswordPolicyError::MissingLowercase);
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(PasswordPolicyError::MissingDigit);
        }
        if password.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(PasswordPolicyError::MissingSpecialCharacter);
        }

        Ok(Self(password))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Command to register a new user with domain types
#[derive(Debug)]
pub struct RegisterUserCommand {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: EmailAddress,
    pub password: Password,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_name_rejects_blank() {
        assert!(PersonName::new("First name", "John".to_string()).is_ok());
        assert_eq!(
            PersonName::new("First name", "   ".to_string()),
            Err(NameError::Empty("First name"))
        );
    }

    #[test]
    fn test_email_accepts_valid_addresses() {
        assert!(EmailAddress::new("john.doe@example.com".to_string()).is_ok());
        assert!(EmailAddress::new("jane_smith-1@example.co.uk".to_string()).is_ok());
    }

    #[test]
    fn test_email_rejects_bad_format() {
        assert!(matches!(
            EmailAddress::new("not-an-email".to_string()),
            Err(EmailError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_email_rejects_special_characters_in_local_part() {
        assert_eq!(
            EmailAddress::new("john+tag@example.com".to_string()),
            Err(EmailError::InvalidCharacters)
        );
    }

    #[test]
    fn test_email_normalized() {
        let email = EmailAddress::new("Alice@Example.com".to_string()).unwrap();
        assert_eq!(email.normalized(), "alice@example.com");
        assert_eq!(email.as_str(), "Alice@Example.com");
    }

    #[test]
    fn test_password_policy() {
        assert!(Password::new("SecurePass123!".to_string()).is_ok());
        assert!(Password::new("Sx1!aaaa".to_string()).is_ok());

        assert_eq!(
            Password::new("Sx1!aaa".to_string()),
            Err(PasswordPolicyError::TooShort { min: 8, actual: 7 })
        );
        assert_eq!(
            Password::new("securepass123!".to_string()),
            Err(PasswordPolicyError::MissingUppercase)
        );
        assert_eq!(
            Password::new("SECUREPASS123!".to_string()),
            Err(PasswordPolicyError::MissingLowercase)
        );
        assert_eq!(
            Password::new("SecurePass!!".to_string()),
            Err(PasswordPolicyError::MissingDigit)
        );
        assert_eq!(
            Password::new("SecurePass123".to_string()),
            Err(PasswordPolicyError::MissingSpecialCharacter)
        );
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let password = Password::new("SecurePass123!".to_string()).unwrap();
        assert_eq!(format!("{password:?}"), "Password(***)");
    }
}
