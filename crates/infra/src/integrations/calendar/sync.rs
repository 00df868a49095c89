//! Calendar sync orchestration
//!
//! Fans a session out to every active integration of its owner, in
//! integration creation order. The first provider write that succeeds
//! becomes the primary mirror and its event id is written back onto the
//! session; later providers receive best-effort copies. One failing
//! provider never aborts work against the others.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use studyflow_core::{IntegrationRepository, SessionRepository};
use studyflow_domain::{
    CalendarProvider, ExternalCalendarEvent, Result, StudySession, StudyflowError,
};
use tracing::{instrument, warn};

use super::oauth::TokenLifecycleManager;
use super::providers::CalendarApi;

/// One provider that failed during a fan-out, with the error kept for reporting.
#[derive(Debug)]
pub struct SyncFailure {
    pub provider: CalendarProvider,
    pub error: StudyflowError,
}

/// Result of pushing a session to all active integrations.
#[derive(Debug, Default)]
pub struct PushOutcome {
    /// Provider and external event id of the primary mirror, if any write succeeded.
    pub primary: Option<(CalendarProvider, String)>,
    pub errors: Vec<SyncFailure>,
}

/// Per-provider result of a delete fan-out.
#[derive(Debug)]
pub struct DeleteOutcome {
    pub provider: CalendarProvider,
    pub result: Result<()>,
}

pub struct CalendarSyncService {
    tokens: Arc<TokenLifecycleManager>,
    google: Arc<dyn CalendarApi>,
    microsoft: Arc<dyn CalendarApi>,
    integrations: Arc<dyn IntegrationRepository>,
    sessions: Arc<dyn SessionRepository>,
}

impl CalendarSyncService {
    pub fn new(
        tokens: Arc<TokenLifecycleManager>,
        google: Arc<dyn CalendarApi>,
        microsoft: Arc<dyn CalendarApi>,
        integrations: Arc<dyn IntegrationRepository>,
        sessions: Arc<dyn SessionRepository>,
    ) -> Self {
        Self { tokens, google, microsoft, integrations, sessions }
    }

    fn client_for(&self, provider: CalendarProvider) -> &dyn CalendarApi {
        match provider {
            CalendarProvider::Google => self.google.as_ref(),
            CalendarProvider::Microsoft => self.microsoft.as_ref(),
        }
    }

    /// Mirror a session to every active integration of its owner.
    ///
    /// The session's existing external reference is updated in place when the
    /// matching provider is reached; all other providers get a fresh event.
    #[instrument(skip(self, session), fields(session_id = %session.id, user_id = %session.user_id))]
    pub async fn push_session(&self, session: &StudySession) -> Result<PushOutcome> {
        let integrations = self.integrations.list_active(&session.user_id).await?;
        let mut outcome = PushOutcome::default();

        for integration in &integrations {
            let provider = integration.provider;
            let result = self.push_to_integration(session, integration).await;
            match result {
                Ok(external_id) => {
                    if outcome.primary.is_none() {
                        outcome.primary = Some((provider, external_id));
                    }
                }
                Err(error) => {
                    warn!(provider = %provider, %error, "calendar push failed");
                    outcome.errors.push(SyncFailure { provider, error });
                }
            }
        }

        if let Some((provider, external_id)) = &outcome.primary {
            let is_current = session.calendar_provider == Some(*provider)
                && session.external_event_id.as_deref() == Some(external_id.as_str());
            if !is_current {
                if let Err(error) =
                    self.sessions.set_external_ref(session.id, *provider, external_id).await
                {
                    warn!(%error, "failed to record primary calendar mirror");
                }
            }
        }

        Ok(outcome)
    }

    async fn push_to_integration(
        &self,
        session: &StudySession,
        integration: &studyflow_domain::CalendarIntegration,
    ) -> Result<String> {
        let fresh = self.tokens.ensure_valid(integration).await?;
        let client = self.client_for(fresh.provider);

        let existing = (session.calendar_provider == Some(fresh.provider))
            .then(|| session.external_event_id.as_deref())
            .flatten();

        match existing {
            Some(event_id) => {
                client.update_event(&fresh.access_token, session, event_id).await?;
                Ok(event_id.to_string())
            }
            None => client.create_event(&fresh.access_token, session).await,
        }
    }

    /// Remove a session's mirror from every active integration.
    ///
    /// Providers without a stored external reference are skipped. Each
    /// provider's result is reported independently; a missing remote event
    /// counts as deleted.
    #[instrument(skip(self, session), fields(session_id = %session.id))]
    pub async fn delete_session(&self, session: &StudySession) -> Result<Vec<DeleteOutcome>> {
        let Some(event_id) = session.external_event_id.as_deref() else {
            return Ok(Vec::new());
        };

        let integrations = self.integrations.list_active(&session.user_id).await?;
        let mut outcomes = Vec::with_capacity(integrations.len());

        for integration in &integrations {
            let provider = integration.provider;
            let result = match self.tokens.ensure_valid(integration).await {
                Ok(fresh) => {
                    self.client_for(provider).delete_event(&fresh.access_token, event_id).await
                }
                Err(error) => Err(error),
            };
            if let Err(error) = &result {
                warn!(provider = %provider, %error, "calendar delete failed");
            }
            outcomes.push(DeleteOutcome { provider, result });
        }

        Ok(outcomes)
    }

    /// Fetch external events from every active integration within a window.
    ///
    /// Events carry their provider tag; a failing provider contributes an
    /// error instead of aborting the whole pull.
    #[instrument(skip(self))]
    pub async fn pull_events(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<(Vec<ExternalCalendarEvent>, Vec<SyncFailure>)> {
        let integrations = self.integrations.list_active(user_id).await?;
        let mut events = Vec::new();
        let mut failures = Vec::new();

        for integration in &integrations {
            let provider = integration.provider;
            let result = match self.tokens.ensure_valid(integration).await {
                Ok(fresh) => {
                    self.client_for(provider).list_events(&fresh.access_token, start, end).await
                }
                Err(error) => Err(error),
            };
            match result {
                Ok(mut fetched) => events.append(&mut fetched),
                Err(error) => {
                    warn!(provider = %provider, %error, "calendar pull failed");
                    failures.push(SyncFailure { provider, error });
                }
            }
        }

        Ok((events, failures))
    }
}
