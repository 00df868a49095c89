//! Persistence ports for study planning
//!
//! Implemented by the infra storage layer; this crate only depends on the
//! contracts. The store is assumed to have read-your-writes semantics.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use studyflow_domain::{CalendarProvider, Result, SessionDraft, StudyPreferences, StudySession};
use uuid::Uuid;

/// Study session persistence
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a draft, assigning an id and `planned` status.
    async fn insert(&self, draft: &SessionDraft) -> Result<StudySession>;

    /// Update a session wholesale.
    async fn update(&self, session: &StudySession) -> Result<()>;

    /// Delete one session.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Fetch one session.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<StudySession>>;

    /// Sessions for a user overlapping `[start, end)`, start-ascending.
    async fn list_in_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StudySession>>;

    /// Delete future planned auto-generated sessions (marker match) and
    /// return the deleted rows so callers can clean up external mirrors.
    async fn delete_auto_generated_after(
        &self,
        user_id: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<StudySession>>;

    /// Record the primary mirror (provider, external id) on a session.
    async fn set_external_ref(
        &self,
        id: Uuid,
        provider: CalendarProvider,
        external_id: &str,
    ) -> Result<()>;
}

/// Study preferences persistence, one row per user
#[async_trait]
pub trait PreferencesRepository: Send + Sync {
    async fn upsert(&self, preferences: &StudyPreferences) -> Result<()>;
    async fn find(&self, user_id: &str) -> Result<Option<StudyPreferences>>;
}
