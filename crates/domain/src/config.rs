//! Application configuration structures
//!
//! Loaded by the infra config loader from environment variables or a
//! JSON/TOML file. OAuth client credentials are carried here explicitly so
//! no component reads ambient process state during a sync operation.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_GENERATION_WEEKS, TOKEN_REFRESH_BUFFER_SECONDS};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub oauth: OAuthClientConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

/// OAuth client credentials for the supported calendar providers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthClientConfig {
    pub google_client_id: String,
    #[serde(skip_serializing)]
    pub google_client_secret: String,
    pub microsoft_client_id: String,
    #[serde(skip_serializing)]
    pub microsoft_client_secret: String,
}

/// Sync and generation tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Number of weeks of sessions generated on a preference save.
    pub generation_weeks: u32,
    /// Client-side timeout applied to every provider/token HTTP call.
    pub request_timeout_seconds: u64,
    /// Lead time before token expiry at which a credential is stale.
    pub refresh_buffer_seconds: i64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            generation_weeks: DEFAULT_GENERATION_WEEKS,
            request_timeout_seconds: 15,
            refresh_buffer_seconds: TOKEN_REFRESH_BUFFER_SECONDS,
        }
    }
}
