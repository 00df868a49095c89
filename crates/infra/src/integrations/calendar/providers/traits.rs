//! Capability trait for calendar provider clients
//!
//! One trait covers the full event capability set; the orchestrator selects
//! a client once per integration instead of branching on the provider
//! repeatedly. Clients never refresh tokens; callers pass a pre-validated
//! access token.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use studyflow_domain::{CalendarProvider, ExternalCalendarEvent, Result, StudySession};

/// Event CRUD against one external calendar provider
#[async_trait]
pub trait CalendarApi: Send + Sync {
    /// Which provider this client talks to.
    fn provider(&self) -> CalendarProvider;

    /// Create a mirrored event; returns the provider's event id.
    ///
    /// # Errors
    /// `ProviderRequestFailed` on a non-success response.
    async fn create_event(&self, access_token: &str, session: &StudySession) -> Result<String>;

    /// Update the mirrored event `event_id` in place.
    ///
    /// # Errors
    /// `ProviderRequestFailed` on a non-success response.
    async fn update_event(
        &self,
        access_token: &str,
        session: &StudySession,
        event_id: &str,
    ) -> Result<()>;

    /// Delete a mirrored event. Failures are surfaced; the orchestrator
    /// treats them as soft since the event may simply not exist here.
    async fn delete_event(&self, access_token: &str, event_id: &str) -> Result<()>;

    /// Events in `[start, end)` from the user's primary calendar.
    async fn list_events(
        &self,
        access_token: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ExternalCalendarEvent>>;
}

/// Build the client for a provider against its real API endpoint.
#[must_use]
pub fn create_client(provider: CalendarProvider, http: reqwest::Client) -> Box<dyn CalendarApi> {
    match provider {
        CalendarProvider::Google => Box::new(super::GoogleCalendarClient::new(http)),
        CalendarProvider::Microsoft => Box::new(super::MicrosoftCalendarClient::new(http)),
    }
}
