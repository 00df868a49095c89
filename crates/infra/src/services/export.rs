//! ICS export of a user's sessions

use std::sync::Arc;

use chrono::{DateTime, Utc};
use studyflow_core::ics::{export_sessions, export_subscribable};
use studyflow_core::SessionRepository;
use studyflow_domain::constants::{ICS_CALENDAR_NAME, ICS_UID_DOMAIN};
use studyflow_domain::Result;
use tracing::instrument;

pub struct IcsExportService {
    sessions: Arc<dyn SessionRepository>,
}

impl IcsExportService {
    pub fn new(sessions: Arc<dyn SessionRepository>) -> Self {
        Self { sessions }
    }

    /// One-shot ICS document for sessions in `[start, end)`.
    #[instrument(skip(self))]
    pub async fn export_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<String> {
        let sessions = self.sessions.list_in_range(user_id, start, end).await?;
        Ok(export_sessions(&sessions))
    }

    /// Subscribable ICS feed with calendar name and refresh hints.
    #[instrument(skip(self))]
    pub async fn export_feed(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<String> {
        let sessions = self.sessions.list_in_range(user_id, start, end).await?;
        Ok(export_subscribable(&sessions, ICS_CALENDAR_NAME, ICS_UID_DOMAIN))
    }
}
