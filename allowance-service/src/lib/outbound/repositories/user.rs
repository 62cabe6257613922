use std::collections::HashMap;

use async_trait::async_trait;
use auth::CredentialRecord;
use auth::CredentialStore;
use auth::StoreError;
use tokio::sync::RwLock;

use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

#[derive(Default)]
struct UserTable {
    users: HashMap<UserId, User>,
    // Lower-cased email -> id
    emails: HashMap<String, UserId>,
}

/// Process-local user store.
///
/// Serves both the user domain and, through [`CredentialStore`], the
/// authentication core. Email lookups are case-insensitive.
#[derive(Default)]
pub struct InMemoryUserRepository {
    table: RwLock<UserTable>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut table = self.table.write().await;

        let email = user.email.normalized();
        if table.emails.contains_key(&email) {
            return Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }

        table.emails.insert(email, user.id);
        table.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.table.read().await.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let table = self.table.read().await;

        Ok(table
            .emails
            .get(&auth::lockout::normalize_identity(email))
            .and_then(|id| table.users.get(id))
            .cloned())
    }
}

#[async_trait]
impl CredentialStore for InMemoryUserRepository {
    async fn find_credential_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CredentialRecord>, StoreError> {
        let user = self
            .find_by_email(email)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(user.map(|user| CredentialRecord {
            identity_id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            encrypted_hash: user.encrypted_password,
        }))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::PersonName;

    fn user(email: &str) -> User {
        User {
            id: UserId::new(),
            first_name: PersonName::new("First name", "Alice".to_string()).unwrap(),
            last_name: PersonName::new("Last name", "Brown".to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            encrypted_password: "sealed-blob".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repository = InMemoryUserRepository::new();
        let created = repository.create(user("alice@example.com")).await.unwrap();

        let by_id = repository.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email.as_str(), "alice@example.com");

        let by_email = repository
            .find_by_email("ALICE@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, created.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_case_insensitive() {
        let repository = InMemoryUserRepository::new();
        repository.create(user("Alice@Example.com")).await.unwrap();

        let result = repository.create(user("alice@example.com")).await;

        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_find_credential_by_email() {
        let repository = InMemoryUserRepository::new();
        let created = repository.create(user("Alice@Example.com")).await.unwrap();

        let record = repository
            .find_credential_by_email("alice@example.com")
            .await
            .unwrap()
            .expect("Credential not found");

        assert_eq!(record.identity_id, created.id.to_string());
        assert_eq!(record.email, "Alice@Example.com");
        assert_eq!(record.encrypted_hash, "sealed-blob");

        assert!(repository
            .find_credential_by_email("bob@example.com")
            .await
            .unwrap()
            .is_none());
    }
}
