use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use crate::models::{AccountError, User};
use crate::password::hash_password;

const DEFAULT_SEED: &str = include_str!("../../fixtures/seed.json");

/// Fixture loaded into a freshly dropped database.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<SeedUser>,
}

/// A seeded account with its plaintext password; hashed at seed time.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub admin: bool,
}

impl SeedData {
    /// The fixture bundled with the binary.
    pub fn default_fixture() -> Result<Self, AccountError> {
        Self::from_json(DEFAULT_SEED)
    }

    pub fn from_json(raw: &str) -> Result<Self, AccountError> {
        serde_json::from_str(raw)
            .map_err(|e| AccountError::invalid_request(&format!("invalid seed data: {e}")))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, AccountError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AccountError::server_error(&format!(
                "failed to read seed file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&raw)
    }

    /// Turn the fixture into storable users, hashing every password.
    ///
    /// Fails before anything is hashed when a username appears twice, so a bad
    /// fixture never gets as far as resetting the database.
    pub fn users(&self) -> Result<Vec<User>, AccountError> {
        let mut seen = HashSet::new();
        if let Some(dup) = self.users.iter().find(|u| !seen.insert(u.username.as_str())) {
            return Err(AccountError::invalid_request(&format!(
                "duplicate username in seed data: {}",
                dup.username
            )));
        }

        self.users
            .iter()
            .map(|seed| {
                Ok(User::new(
                    seed.username.clone(),
                    hash_password(&seed.password)?,
                    seed.email.clone(),
                    seed.name.clone(),
                    seed.admin,
                ))
            })
            .collect()
    }
}
