//! Service wiring
//!
//! Builds the full service graph from one `Config`: connection pool,
//! repositories, HTTP clients with the configured timeout, token manager,
//! sync orchestrator, and the application services on top.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use studyflow_core::{
    CustomEventRepository, IntegrationRepository, PreferencesRepository, SessionRepository,
};
use studyflow_domain::{CalendarProvider, Config, Result, StudyflowError};
use tracing::info;

use crate::database::{
    open_pool, SqliteCustomEventRepository, SqliteIntegrationRepository,
    SqliteNotificationRepository, SqlitePreferencesRepository, SqliteSessionRepository,
};
use crate::integrations::calendar::{create_client, CalendarSyncService, TokenLifecycleManager};

use super::{
    CalendarViewService, IcsExportService, IntegrationService, NotificationService,
    StudyPlannerService,
};

/// The fully wired application service graph
pub struct AppServices {
    pub planner: StudyPlannerService,
    pub calendar_view: CalendarViewService,
    pub notifications: NotificationService,
    pub export: IcsExportService,
    pub integrations: IntegrationService,
}

impl AppServices {
    /// Wire every service from configuration.
    ///
    /// # Errors
    /// `Database` when the pool cannot be opened, `Internal` when the HTTP
    /// client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        let pool = open_pool(&config.database)?;

        let sessions: Arc<dyn SessionRepository> =
            Arc::new(SqliteSessionRepository::new(Arc::clone(&pool)));
        let preferences: Arc<dyn PreferencesRepository> =
            Arc::new(SqlitePreferencesRepository::new(Arc::clone(&pool)));
        let integrations: Arc<dyn IntegrationRepository> =
            Arc::new(SqliteIntegrationRepository::new(Arc::clone(&pool)));
        let custom_events: Arc<dyn CustomEventRepository> =
            Arc::new(SqliteCustomEventRepository::new(Arc::clone(&pool)));
        let notifications = Arc::new(SqliteNotificationRepository::new(pool));

        let http = Client::builder()
            .timeout(Duration::from_secs(config.sync.request_timeout_seconds))
            .build()
            .map_err(|e| StudyflowError::Internal(format!("failed to build HTTP client: {e}")))?;

        let tokens = Arc::new(
            TokenLifecycleManager::new(
                http.clone(),
                config.oauth.clone(),
                Arc::clone(&integrations),
            )
            .with_refresh_buffer(config.sync.refresh_buffer_seconds),
        );
        let sync = Arc::new(CalendarSyncService::new(
            tokens,
            Arc::from(create_client(CalendarProvider::Google, http.clone())),
            Arc::from(create_client(CalendarProvider::Microsoft, http)),
            Arc::clone(&integrations),
            Arc::clone(&sessions),
        ));

        info!(
            db_path = %config.database.path,
            generation_weeks = config.sync.generation_weeks,
            "application services wired"
        );

        Ok(Self {
            planner: StudyPlannerService::new(
                preferences,
                Arc::clone(&sessions),
                Arc::clone(&sync),
                config.sync.generation_weeks,
            ),
            calendar_view: CalendarViewService::new(sync, Arc::clone(&sessions), custom_events),
            notifications: NotificationService::new(notifications),
            export: IcsExportService::new(sessions),
            integrations: IntegrationService::new(integrations),
        })
    }
}
