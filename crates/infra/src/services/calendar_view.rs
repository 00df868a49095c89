//! Unified calendar view
//!
//! Pulls external events, local sessions, and custom events for a window
//! and merges them into one deduplicated list. Provider pull failures are
//! reported alongside the events rather than aborting the view.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use studyflow_core::{merge_events, CustomEventRepository, SessionRepository};
use studyflow_domain::{MergedCalendarEvent, Result};
use tracing::instrument;

use crate::integrations::calendar::{CalendarSyncService, SyncFailure};

pub struct CalendarViewService {
    sync: Arc<CalendarSyncService>,
    sessions: Arc<dyn SessionRepository>,
    custom_events: Arc<dyn CustomEventRepository>,
}

impl CalendarViewService {
    pub fn new(
        sync: Arc<CalendarSyncService>,
        sessions: Arc<dyn SessionRepository>,
        custom_events: Arc<dyn CustomEventRepository>,
    ) -> Self {
        Self { sync, sessions, custom_events }
    }

    /// Merged events for `[start, end)`, plus any provider pull failures.
    #[instrument(skip(self))]
    pub async fn events_in_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<(Vec<MergedCalendarEvent>, Vec<SyncFailure>)> {
        let (external, failures) = self.sync.pull_events(user_id, start, end).await?;
        let sessions = self.sessions.list_in_range(user_id, start, end).await?;
        let custom = self.custom_events.list_in_range(user_id, start, end).await?;
        Ok((merge_events(external, sessions, custom), failures))
    }
}
