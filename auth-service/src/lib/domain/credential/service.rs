use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;

use crate::credential::errors::CredentialError;
use crate::credential::models::LoginCommand;
use crate::credential::models::NewUser;
use crate::credential::models::RegisterCommand;
use crate::credential::models::User;
use crate::credential::ports::CredentialRepository;
use crate::credential::ports::CredentialServicePort;

/// Domain service implementation for registration and login.
///
/// Concrete implementation of CredentialServicePort with dependency injection.
pub struct CredentialService<CR>
where
    CR: CredentialRepository,
{
    repository: Arc<CR>,
    authenticator: Arc<Authenticator>,
}

impl<CR> CredentialService<CR>
where
    CR: CredentialRepository,
{
    /// Create a new credential service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential persistence implementation
    /// * `authenticator` - Password hashing and token issuance
    ///
    /// # Returns
    /// Configured credential service instance
    pub fn new(repository: Arc<CR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

#[async_trait]
impl<CR> CredentialServicePort for CredentialService<CR>
where
    CR: CredentialRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, CredentialError> {
        if self.repository.username_exists(&command.username).await? {
            return Err(CredentialError::UsernameAlreadyExists(
                command.username.to_string(),
            ));
        }

        let password_hash = self
            .authenticator
            .hash_password(command.password.expose())
            .map_err(|e| CredentialError::PasswordHashing(e.to_string()))?;

        // A concurrent registration can still win between the check and the
        // insert; the store's unique constraint reports it as a conflict.
        let user = self
            .repository
            .create(NewUser {
                username: command.username,
                password_hash,
            })
            .await?;

        tracing::info!("Registered user {} ({})", user.username, user.id);

        Ok(user)
    }

    async fn login(&self, command: LoginCommand) -> Result<String, CredentialError> {
        let user = self
            .repository
            .find_by_username(&command.username)
            .await?
            .ok_or(CredentialError::InvalidCredentials)?;

        let user_id = u64::try_from(user.id.0)
            .map_err(|_| CredentialError::Unknown(format!("Negative user id {}", user.id)))?;

        let result = self
            .authenticator
            .authenticate(
                command.password.expose(),
                &user.password_hash,
                user.username.as_str(),
                user_id,
            )
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => CredentialError::InvalidCredentials,
                AuthenticationError::PasswordError(e) => {
                    CredentialError::PasswordHashing(e.to_string())
                }
                AuthenticationError::JwtError(e) => CredentialError::TokenIssuance(e.to_string()),
            })?;

        Ok(result.access_token)
    }
}
