//! Calendar integration credentials
//!
//! One row per (user, provider), created on OAuth callback and mutated only
//! by the token lifecycle manager.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Supported external calendar providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarProvider {
    Google,
    Microsoft,
}

impl CalendarProvider {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Microsoft => "microsoft",
        }
    }

    /// Parse the lowercase provider name used in storage and wire payloads.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "google" => Some(Self::Google),
            "microsoft" => Some(Self::Microsoft),
            _ => None,
        }
    }
}

impl std::fmt::Display for CalendarProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored OAuth credential for one user/provider pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarIntegration {
    pub id: Uuid,
    pub user_id: String,
    pub provider: CalendarProvider,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub scope: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CalendarIntegration {
    /// A credential is stale when it expires within the refresh buffer.
    #[must_use]
    pub fn is_stale(&self, buffer_seconds: i64, now: DateTime<Utc>) -> bool {
        (self.expires_at - now).num_seconds() < buffer_seconds
    }
}
