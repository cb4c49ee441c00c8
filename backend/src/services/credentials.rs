//! Credential workflow
//!
//! Turns a login attempt into an issued token or a rejection, and a
//! registration into a stored user.
//!
//! ```text
//! LookupUser -> Found    -> VerifyPassword -> Match   -> IssueToken
//!                                          -> NoMatch -> InvalidCredentials
//!            -> NotFound -> InvalidCredentials
//! ```
//!
//! An unknown username and a wrong password must be indistinguishable to
//! the caller: same error, same hashing work.
//!
//! # Performance
//!
//! Hashing runs on the blocking thread pool so a slow hasher (Argon2)
//! never stalls the async runtime.

use crate::auth::{generate_salt, HashingService, TokenClaims, TokenService, TokenVerification};
use crate::repositories::{StoreError, User, UserDataSource};
use credential_service_shared::AuthError;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Salt used to burn an equivalent hash when the username is unknown
const DUMMY_SALT: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// A freshly issued token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// Credential workflow service
///
/// Cheap to clone; every collaborator is shared behind an `Arc`.
#[derive(Clone)]
pub struct CredentialService {
    users: Arc<dyn UserDataSource>,
    hashing: Arc<dyn HashingService>,
    tokens: TokenService,
}

impl CredentialService {
    pub fn new(
        users: Arc<dyn UserDataSource>,
        hashing: Arc<dyn HashingService>,
        tokens: TokenService,
    ) -> Self {
        Self {
            users,
            hashing,
            tokens,
        }
    }

    /// Authenticate a username/password pair and issue a token
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<IssuedToken, AuthError> {
        let user = self
            .users
            .find_by_username(username)
            .await
            .map_err(store_unavailable)?;

        let (salt, expected_hash) = match &user {
            Some(user) => (user.salt.clone(), user.password_hash.clone()),
            None => (DUMMY_SALT.to_string(), String::new()),
        };
        let password_matches = self
            .verify_password(password.to_string(), salt, expected_hash)
            .await?;

        let user = match user {
            Some(user) if password_matches => user,
            _ => {
                warn!(username = %username, "Rejected sign-in attempt");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let token = self
            .tokens
            .generate(TokenClaims::new(user.id, user.username.as_str()))
            .map_err(|e| AuthError::Internal(format!("token issuance failed: {e}")))?;

        info!(username = %user.username, user_id = %user.id, "Issued token");

        Ok(IssuedToken {
            token,
            expires_in: self.tokens.expires_in_secs(),
        })
    }

    /// Register a new user under a freshly generated salt
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let salt = generate_salt();
        let password_hash = self.hash_password(password.to_string(), salt.clone()).await?;
        let user = User::new(username, password_hash, salt);

        match self.users.insert_user(&user).await {
            Ok(()) => {
                info!(username = %user.username, user_id = %user.id, "Registered user");
                Ok(user)
            }
            Err(StoreError::DuplicateUsername) => {
                warn!(username = %username, "Registration rejected: username taken");
                Err(AuthError::DuplicateUsername)
            }
            Err(e) => Err(store_unavailable(e)),
        }
    }

    /// Verify a bearer token
    #[inline]
    pub fn verify_token(&self, token: &str) -> TokenVerification {
        self.tokens.verify(token)
    }

    /// Check that the user store is reachable
    pub async fn store_health(&self) -> Result<(), AuthError> {
        self.users.health_check().await.map_err(store_unavailable)
    }

    async fn verify_password(
        &self,
        password: String,
        salt: String,
        expected_hash: String,
    ) -> Result<bool, AuthError> {
        let hashing = Arc::clone(&self.hashing);
        tokio::task::spawn_blocking(move || hashing.verify(&password, &salt, &expected_hash))
            .await
            .map_err(|e| AuthError::Internal(format!("password verification task failed: {e}")))
    }

    async fn hash_password(&self, password: String, salt: String) -> Result<String, AuthError> {
        let hashing = Arc::clone(&self.hashing);
        tokio::task::spawn_blocking(move || hashing.generate_salted_hash(&password, &salt))
            .await
            .map_err(|e| AuthError::Internal(format!("password hashing task failed: {e}")))?
            .map_err(|e| AuthError::Internal(format!("password hashing failed: {e}")))
    }
}

fn store_unavailable(e: StoreError) -> AuthError {
    error!(error = ?e, "User store error");
    AuthError::Unavailable("user store unavailable".to_string())
}
