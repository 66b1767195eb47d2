use async_trait::async_trait;
use std::sync::Arc;

use account_core::{AccountError, SeedData, User};

/// Trait implemented by all persistence backends.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initialize the backing store (e.g., bootstrap schema / create indexes).
    async fn init(&self) -> Result<(), AccountError>;

    /// Drop every Account App table and recreate an empty schema.
    async fn reset(&self) -> Result<(), AccountError>;

    // User operations
    async fn save_user(&self, user: &User) -> Result<(), AccountError>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AccountError>;
    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, AccountError>;

    /// Reset the store and load the given fixture.
    ///
    /// Running it twice with the same fixture leaves the same set of users.
    async fn drop_and_seed(&self, seed: &SeedData) -> Result<(), AccountError> {
        let users = seed.users()?;
        self.reset().await?;
        for user in &users {
            self.save_user(user).await?;
        }
        Ok(())
    }

    /// Lightweight liveness/readiness check.
    ///
    /// Implementations may override to do something cheaper than `init()`.
    async fn healthcheck(&self) -> Result<(), AccountError> {
        self.init().await
    }
}

pub type DynStorage = Arc<dyn Storage>;
