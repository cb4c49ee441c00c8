//! Startup seeding
//!
//! Creates the configured seed account before the server starts
//! accepting traffic. The step is awaited in `main`; a store failure
//! aborts startup instead of being lost in a background task.

use crate::config::BootstrapConfig;
use crate::services::CredentialService;
use anyhow::Result;
use credential_service_shared::AuthError;
use tracing::info;

/// What the seed step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// No seed user configured
    Skipped,
    Created,
    /// The username was already registered; left untouched
    AlreadyPresent,
}

/// Register the configured seed user, if any
pub async fn seed(credentials: &CredentialService, config: &BootstrapConfig) -> Result<SeedOutcome> {
    let Some(seed_user) = &config.seed_user else {
        return Ok(SeedOutcome::Skipped);
    };

    match credentials
        .register(&seed_user.username, &seed_user.password)
        .await
    {
        Ok(user) => {
            info!(username = %user.username, "Seed user created");
            Ok(SeedOutcome::Created)
        }
        Err(AuthError::DuplicateUsername) => {
            info!(username = %seed_user.username, "Seed user already present");
            Ok(SeedOutcome::AlreadyPresent)
        }
        Err(e) => Err(anyhow::anyhow!("Failed to seed user: {}", e)),
    }
}
