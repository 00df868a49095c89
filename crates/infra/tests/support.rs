//! Shared fixtures for the infra integration tests

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use studyflow_domain::{CalendarIntegration, CalendarProvider, Recurrence, SessionDraft};
use studyflow_infra::database::{
    open_memory_pool, SqliteCustomEventRepository, SqliteIntegrationRepository,
    SqliteNotificationRepository, SqlitePreferencesRepository, SqliteSessionRepository,
};
use uuid::Uuid;

/// Repositories over one shared in-memory database.
pub struct TestStore {
    pub sessions: Arc<SqliteSessionRepository>,
    pub integrations: Arc<SqliteIntegrationRepository>,
    pub preferences: Arc<SqlitePreferencesRepository>,
    pub custom_events: Arc<SqliteCustomEventRepository>,
    pub notifications: Arc<SqliteNotificationRepository>,
}

pub fn setup_store() -> TestStore {
    let pool = open_memory_pool().expect("failed to open in-memory database");
    TestStore {
        sessions: Arc::new(SqliteSessionRepository::new(Arc::clone(&pool))),
        integrations: Arc::new(SqliteIntegrationRepository::new(Arc::clone(&pool))),
        preferences: Arc::new(SqlitePreferencesRepository::new(Arc::clone(&pool))),
        custom_events: Arc::new(SqliteCustomEventRepository::new(Arc::clone(&pool))),
        notifications: Arc::new(SqliteNotificationRepository::new(pool)),
    }
}

/// A stored credential expiring `expires_in_minutes` from now.
pub fn integration_fixture(
    user_id: &str,
    provider: CalendarProvider,
    expires_in_minutes: i64,
) -> CalendarIntegration {
    CalendarIntegration {
        id: Uuid::now_v7(),
        user_id: user_id.to_string(),
        provider,
        access_token: format!("access-{provider}"),
        refresh_token: Some(format!("refresh-{provider}")),
        expires_at: Utc::now() + Duration::minutes(expires_in_minutes),
        scope: None,
        created_at: Utc::now(),
    }
}

/// A one-hour draft starting at the given UTC instant.
pub fn draft_fixture(user_id: &str, start: DateTime<Utc>) -> SessionDraft {
    SessionDraft {
        user_id: user_id.to_string(),
        plan_id: None,
        title: "Sesión de estudio".to_string(),
        description: "Sesión de estudio programada automáticamente".to_string(),
        start_time: start,
        end_time: start + Duration::hours(1),
        recurrence: Recurrence::weekly(vec![1, 3, 5]),
    }
}

pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).single().expect("valid timestamp")
}
