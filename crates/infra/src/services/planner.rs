//! Study session planning
//!
//! Saving preferences regenerates the upcoming schedule: future planned
//! auto-generated sessions are removed (with best-effort cleanup of their
//! calendar mirrors), then the new window is expanded and each fresh
//! session is mirrored out. Sync failures are collected, never fatal; the
//! local schedule is the source of truth.

use std::sync::Arc;

use chrono::Utc;
use studyflow_core::scheduling::recurrence::{expand, ExpansionRequest};
use studyflow_core::scheduling::time_blocks::{blocks_for_time_of_day, resolve_blocks};
use studyflow_core::{PreferencesRepository, SessionRepository};
use studyflow_domain::{Result, StudyPlan, StudyPreferences, StudySession, TimeBlock};
use tracing::{info, instrument, warn};

use crate::integrations::calendar::{CalendarSyncService, SyncFailure};

/// What a regeneration run did, for surfacing to the caller
#[derive(Debug, Default)]
pub struct RegenerationSummary {
    pub deleted: usize,
    pub generated: Vec<StudySession>,
    pub sync_errors: Vec<SyncFailure>,
}

pub struct StudyPlannerService {
    preferences: Arc<dyn PreferencesRepository>,
    sessions: Arc<dyn SessionRepository>,
    sync: Arc<CalendarSyncService>,
    generation_weeks: u32,
}

impl StudyPlannerService {
    pub fn new(
        preferences: Arc<dyn PreferencesRepository>,
        sessions: Arc<dyn SessionRepository>,
        sync: Arc<CalendarSyncService>,
        generation_weeks: u32,
    ) -> Self {
        Self { preferences, sessions, sync, generation_weeks }
    }

    /// Persist preferences and rebuild the upcoming auto-generated schedule.
    #[instrument(skip(self, preferences), fields(user_id = %preferences.user_id))]
    pub async fn save_preferences(
        &self,
        preferences: &StudyPreferences,
    ) -> Result<RegenerationSummary> {
        self.preferences.upsert(preferences).await?;
        let blocks = blocks_for_time_of_day(
            preferences.time_of_day,
            Some(preferences.session_minutes),
        )?;
        self.regenerate(
            &preferences.user_id,
            None,
            &preferences.days_of_week,
            &blocks,
            &preferences.timezone,
        )
        .await
    }

    /// Rebuild the schedule from an explicit plan's time blocks.
    #[instrument(skip(self, plan), fields(plan_id = %plan.id, user_id = %plan.user_id))]
    pub async fn regenerate_from_plan(
        &self,
        plan: &StudyPlan,
        timezone: &str,
    ) -> Result<RegenerationSummary> {
        let blocks = resolve_blocks(&plan.time_blocks, None)?;
        self.regenerate(&plan.user_id, Some(plan.id), &plan.days_of_week, &blocks, timezone)
            .await
    }

    async fn regenerate(
        &self,
        user_id: &str,
        plan_id: Option<uuid::Uuid>,
        days_of_week: &[u8],
        blocks: &[TimeBlock],
        timezone: &str,
    ) -> Result<RegenerationSummary> {
        let now = Utc::now();
        let mut summary = RegenerationSummary::default();

        let removed = self.sessions.delete_auto_generated_after(user_id, now).await?;
        summary.deleted = removed.len();
        for session in &removed {
            if session.external_event_id.is_none() {
                continue;
            }
            // best effort; a lingering remote event is not worth failing over
            if let Err(error) = self.sync.delete_session(session).await {
                warn!(session_id = %session.id, %error, "mirror cleanup failed");
            }
        }

        let drafts = expand(&ExpansionRequest {
            user_id,
            plan_id,
            days_of_week,
            blocks,
            start_date: now.date_naive(),
            weeks: self.generation_weeks,
            timezone,
        });

        for draft in &drafts {
            let session = self.sessions.insert(draft).await?;
            let outcome = self.sync.push_session(&session).await?;
            summary.sync_errors.extend(outcome.errors);
            summary.generated.push(session);
        }

        info!(
            user_id,
            deleted = summary.deleted,
            generated = summary.generated.len(),
            sync_errors = summary.sync_errors.len(),
            "regenerated study schedule"
        );
        Ok(summary)
    }
}
