//! User service for registration and login

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::user::{
    validate_password, validate_username, NewUser, User, UserId, UserRepository,
};
use crate::domain::DomainError;
use crate::infrastructure::auth::{IssuedToken, TokenIssuer};

use super::password::PasswordHasher;

/// User service composing the credential store, password hasher and token issuer
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher, T: TokenIssuer> {
    repository: Arc<R>,
    hasher: Arc<H>,
    tokens: Arc<T>,
}

impl<R: UserRepository, H: PasswordHasher, T: TokenIssuer> UserService<R, H, T> {
    /// Create a new user service
    pub fn new(repository: Arc<R>, hasher: Arc<H>, tokens: Arc<T>) -> Self {
        Self {
            repository,
            hasher,
            tokens,
        }
    }

    /// Register a new user
    ///
    /// Creates exactly one user record on success and none on failure.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, DomainError> {
        validate_username(username)?;
        validate_password(password)?;

        if self.repository.get_by_username(username).await?.is_some() {
            return Err(DomainError::username_taken(username));
        }

        let password_hash = self.hash_password(password).await?;

        // A concurrent registration can win between the lookup and the insert
        let user = self
            .repository
            .create(NewUser::new(username, password_hash))
            .await
            .map_err(|e| match e {
                DomainError::DuplicateKey { field } if field == "username" => {
                    DomainError::username_taken(username)
                }
                other => other,
            })?;

        info!(user_id = %user.id(), "User registered");

        Ok(user)
    }

    /// Authenticate with username and password and issue a token
    ///
    /// Unknown usernames and wrong passwords fail with the same error.
    pub async fn login(&self, username: &str, password: &str) -> Result<IssuedToken, DomainError> {
        let Some(user) = self.repository.get_by_username(username).await? else {
            // Unknown usernames pay the same hashing cost as wrong passwords
            self.verify_password(password, None).await?;
            return Err(DomainError::InvalidCredentials);
        };

        let stored_hash = user.password_hash().to_string();
        if !self.verify_password(password, Some(stored_hash)).await? {
            debug!(user_id = %user.id(), "Password verification failed");
            return Err(DomainError::InvalidCredentials);
        }

        self.tokens.issue(&user)
    }

    /// Get a user by ID
    pub async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        self.repository.get(id).await
    }

    async fn hash_password(&self, password: &str) -> Result<String, DomainError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::hashing(format!("Password hashing task failed: {}", e)))?
    }

    /// Check a password on the blocking pool; `None` checks against no user
    async fn verify_password(
        &self,
        password: &str,
        stored_hash: Option<String>,
    ) -> Result<bool, DomainError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();

        tokio::task::spawn_blocking(move || match stored_hash {
            Some(hash) => hasher.verify(&password, &hash),
            None => {
                hasher.verify_absent(&password);
                false
            }
        })
        .await
        .map_err(|e| DomainError::internal(format!("Password verification task failed: {}", e)))
    }
}
