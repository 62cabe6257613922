use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationService;
use auth::CredentialStore;
use chrono::Utc;

use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR, CS>
where
    UR: UserRepository,
    CS: CredentialStore,
{
    repository: Arc<UR>,
    authentication: Arc<AuthenticationService<CS>>,
}

impl<UR, CS> UserService<UR, CS>
where
    UR: UserRepository,
    CS: CredentialStore,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authentication` - Seals passwords before they are stored
    pub fn new(repository: Arc<UR>, authentication: Arc<AuthenticationService<CS>>) -> Self {
        Self {
            repository,
            authentication,
        }
    }
}

#[async_trait]
impl<UR, CS> UserServicePort for UserService<UR, CS>
where
    UR: UserRepository,
    CS: CredentialStore,
{
    async fn register_user(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::EmailAlreadyExists(
                command.email.as_str().to_string(),
            ));
        }

        let encrypted_password = self
            .authentication
            .seal_password(command.password.as_str())
            .map_err(|e| UserError::Unknown(format!("Password sealing failed: {}", e)))?;

        let user = User {
            id: UserId::new(),
            first_name: command.first_name,
            last_name: command.last_name,
            email: command.email,
            encrypted_password,
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;

        tracing::info!(user_id = %created_user.id, "User registered");

        Ok(created_user)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }
}
