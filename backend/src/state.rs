//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! Every component is constructed here from already-resolved
//! configuration and injected into the next; nothing reads the process
//! environment after startup.

use crate::auth::TokenService;
use crate::config::{AppConfig, ConfigError};
use crate::repositories::UserDataSource;
use crate::services::CredentialService;
use std::sync::Arc;

/// Shared application state
///
/// Cheap to clone across async tasks.
#[derive(Clone)]
pub struct AppState {
    /// Credential workflow with its store, hasher and token service
    pub credentials: CredentialService,
}

impl AppState {
    /// Create a new application state
    ///
    /// Fails if the token configuration is incomplete. This pre-computes
    /// JWT keys from the config secret, so call it once at startup.
    pub fn new(users: Arc<dyn UserDataSource>, config: &AppConfig) -> Result<Self, ConfigError> {
        let token_config = config.token_config()?;
        let tokens = TokenService::new(&token_config);
        let hashing = config.auth.hashing.build();

        Ok(Self {
            credentials: CredentialService::new(users, hashing, tokens),
        })
    }

    /// Get a reference to the credential workflow
    #[inline]
    pub fn credentials(&self) -> &CredentialService {
        &self.credentials
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryUserDataSource;

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.jwt.secret = "test-secret-key-for-testing-only-32chars".to_string();
        config
    }

    #[test]
    fn test_state_requires_secret() {
        let result = AppState::new(Arc::new(InMemoryUserDataSource::new()), &AppConfig::default());
        assert!(matches!(result, Err(ConfigError::MissingSecret)));
    }

    #[tokio::test]
    async fn test_state_clone_shares_store() {
        let state = AppState::new(Arc::new(InMemoryUserDataSource::new()), &test_config()).unwrap();
        let cloned = state.clone();

        state.credentials().register("alice", "password1").await.unwrap();
        assert!(cloned.credentials().authenticate("alice", "password1").await.is_ok());
    }
}
