//! Persistence ports for calendar integrations and custom events

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use studyflow_domain::{CalendarIntegration, CalendarProvider, CustomEvent, Result};
use uuid::Uuid;

/// Stored OAuth credentials, one per (user, provider)
#[async_trait]
pub trait IntegrationRepository: Send + Sync {
    /// Insert or replace the credential for (user, provider).
    async fn upsert(&self, integration: &CalendarIntegration) -> Result<()>;

    /// Active integrations for a user, ordered by creation time ascending.
    /// The first entry is the deterministic primary for sync fan-out.
    async fn list_active(&self, user_id: &str) -> Result<Vec<CalendarIntegration>>;

    /// Persist refreshed tokens. `refresh_token` of `None` keeps the stored
    /// one (providers that do not rotate).
    async fn update_tokens(
        &self,
        id: Uuid,
        access_token: &str,
        refresh_token: Option<&str>,
        expires_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Remove the credential on user disconnect.
    async fn delete(&self, user_id: &str, provider: CalendarProvider) -> Result<()>;
}

/// User-authored local events
#[async_trait]
pub trait CustomEventRepository: Send + Sync {
    async fn insert(&self, event: &CustomEvent) -> Result<()>;

    /// Events for a user overlapping `[start, end)`, start-ascending.
    async fn list_in_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CustomEvent>>;
}
