use hocon::HoconLoader;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Minimum signing key length accepted by the cookie session store.
pub const SESSION_KEY_MIN_BYTES: usize = 64;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub oauth: OAuthConfig,
    #[serde(default)]
    pub session: Option<SessionConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    /// Drop and reseed the database before serving (test and demo setups).
    #[serde(default)]
    pub seed_on_start: bool,
    /// JSON seed fixture; the bundled fixture is used when unset.
    #[serde(default)]
    pub seed_file: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OAuthConfig {
    /// Base path the Account App pages are served under.
    #[serde(default = "default_root_path")]
    pub root_path: String,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
        }
    }
}

fn default_root_path() -> String {
    "/oauth".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Hex-encoded cookie signing key (at least 64 bytes once decoded).
    pub key: Option<String>,
    #[serde(default)]
    pub secure_cookie: bool,
}

impl Default for Config {
    fn default() -> Self {
        // Try to load from HOCON file first, fall back to environment variables
        Self::from_hocon().unwrap_or_else(|e| {
            tracing::warn!(
                "Failed to load HOCON config: {}. Falling back to environment variables.",
                e
            );
            Self::from_env_fallback()
        })
    }
}

impl Config {
    /// Load configuration from HOCON file with environment variable substitution
    pub fn from_hocon() -> Result<Self, String> {
        Self::from_hocon_path("application.conf")
    }

    /// Load configuration from a specific HOCON file path
    pub fn from_hocon_path<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(format!("Configuration file not found: {}", path.display()));
        }

        HoconLoader::new()
            .load_file(path)
            .map_err(|e| format!("Failed to load HOCON file: {}", e))?
            .resolve()
            .map_err(|e| format!("Failed to parse and resolve HOCON: {}", e))
    }

    /// Load strictly from `ACCOUNT_*` environment variables (nested keys use `__`).
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("ACCOUNT").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Fallback configuration from flat environment variables with defaults.
    fn from_env_fallback() -> Self {
        let session_key = std::env::var("ACCOUNT_SESSION_KEY").ok();
        let secure_cookie = std::env::var("ACCOUNT_SESSION_SECURE_COOKIE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(false);

        Self {
            server: ServerConfig {
                host: std::env::var("ACCOUNT_SERVER_HOST")
                    .unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: std::env::var("ACCOUNT_SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            database: DatabaseConfig {
                url: std::env::var("ACCOUNT_DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite:account.db?mode=rwc".to_string()),
                seed_on_start: std::env::var("ACCOUNT_DATABASE_SEED_ON_START")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(false),
                seed_file: std::env::var("ACCOUNT_DATABASE_SEED_FILE").ok(),
            },
            oauth: OAuthConfig {
                root_path: std::env::var("ACCOUNT_OAUTH_ROOT_PATH")
                    .unwrap_or_else(|_| default_root_path()),
            },
            session: Some(SessionConfig {
                key: session_key,
                secure_cookie,
            }),
        }
    }

    /// Decoded session signing key, if one is configured.
    pub fn session_key_bytes(&self) -> Result<Option<Vec<u8>>, String> {
        let Some(hex_key) = self.session.as_ref().and_then(|s| s.key.as_deref()) else {
            return Ok(None);
        };

        let bytes = hex::decode(hex_key.trim())
            .map_err(|e| format!("ACCOUNT_SESSION_KEY must be hex encoded: {}", e))?;

        if bytes.len() < SESSION_KEY_MIN_BYTES {
            return Err(format!(
                "ACCOUNT_SESSION_KEY must decode to at least {} bytes (current: {} bytes)",
                SESSION_KEY_MIN_BYTES,
                bytes.len()
            ));
        }

        Ok(Some(bytes))
    }

    pub fn secure_cookie(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.secure_cookie)
    }

    /// Validate configuration for production use
    pub fn validate_for_production(&self) -> Result<(), String> {
        if self.session_key_bytes()?.is_none() {
            return Err("ACCOUNT_SESSION_KEY must be explicitly set for production. Generate at least 64 random bytes and hex encode them.".to_string());
        }

        if self.database.seed_on_start {
            return Err(
                "database.seed_on_start drops all accounts and must not be enabled in production"
                    .to_string(),
            );
        }

        Ok(())
    }

    /// Produce a version safe to log (secrets masked).
    pub fn sanitized(&self) -> Self {
        let mut clone = self.clone();

        if let Some(ref mut session) = clone.session {
            if let Some(ref mut key) = session.key {
                *key = "***MASKED***".to_string();
            }
        }

        clone
    }
}
