//! SQLite-backed implementations of the core persistence ports
//!
//! One repository per aggregate, all sharing an r2d2 connection pool. Times
//! are stored as unix epoch seconds, ids as UUID strings, and structured
//! columns (weekday sets, recurrence descriptors) as JSON text.

mod custom_events;
mod integrations;
mod notifications;
mod preferences;
mod sessions;

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use r2d2_sqlite::SqliteConnectionManager;
use studyflow_domain::{DatabaseConfig, Result, StudyflowError};

pub use custom_events::SqliteCustomEventRepository;
pub use integrations::SqliteIntegrationRepository;
pub use notifications::SqliteNotificationRepository;
pub use preferences::SqlitePreferencesRepository;
pub use sessions::SqliteSessionRepository;

use crate::errors::InfraError;

/// Shared connection pool
pub type DbPool = r2d2::Pool<SqliteConnectionManager>;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS study_preferences (
    user_id         TEXT PRIMARY KEY,
    days_of_week    TEXT NOT NULL,
    time_of_day     TEXT NOT NULL,
    session_minutes INTEGER NOT NULL,
    timezone        TEXT NOT NULL,
    updated_at      INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS study_sessions (
    id                TEXT PRIMARY KEY,
    user_id           TEXT NOT NULL,
    plan_id           TEXT,
    title             TEXT NOT NULL,
    description       TEXT NOT NULL,
    start_time        INTEGER NOT NULL,
    end_time          INTEGER NOT NULL,
    status            TEXT NOT NULL,
    recurrence        TEXT,
    external_event_id TEXT,
    calendar_provider TEXT,
    created_at        INTEGER NOT NULL,
    updated_at        INTEGER NOT NULL,
    CHECK (end_time > start_time)
);
CREATE INDEX IF NOT EXISTS idx_sessions_user_start
    ON study_sessions(user_id, start_time);

CREATE TABLE IF NOT EXISTS calendar_integrations (
    id            TEXT PRIMARY KEY,
    user_id       TEXT NOT NULL,
    provider      TEXT NOT NULL,
    access_token  TEXT NOT NULL,
    refresh_token TEXT,
    expires_at    INTEGER NOT NULL,
    scope         TEXT,
    created_at    INTEGER NOT NULL,
    UNIQUE(user_id, provider)
);

CREATE TABLE IF NOT EXISTS custom_events (
    id                TEXT PRIMARY KEY,
    user_id           TEXT NOT NULL,
    title             TEXT NOT NULL,
    description       TEXT,
    start_time        INTEGER NOT NULL,
    end_time          INTEGER NOT NULL,
    all_day           INTEGER NOT NULL DEFAULT 0,
    external_event_id TEXT,
    provider          TEXT,
    source            TEXT NOT NULL,
    CHECK (end_time > start_time)
);
CREATE INDEX IF NOT EXISTS idx_custom_events_user_start
    ON custom_events(user_id, start_time);

CREATE TABLE IF NOT EXISTS notifications (
    id         TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL,
    kind       TEXT NOT NULL,
    title      TEXT NOT NULL,
    body       TEXT,
    created_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_notifications_user_kind_created
    ON notifications(user_id, kind, created_at);
";

/// Open a pooled connection to the configured database and apply the schema.
///
/// # Errors
/// Returns `StudyflowError::Database` if the pool or schema setup fails.
pub fn open_pool(config: &DatabaseConfig) -> Result<Arc<DbPool>> {
    let manager = SqliteConnectionManager::file(&config.path);
    let pool = r2d2::Pool::builder()
        .max_size(config.pool_size)
        .build(manager)
        .map_err(InfraError::from)?;

    let conn = pool.get().map_err(InfraError::from)?;
    conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;")
        .map_err(InfraError::from)?;
    conn.execute_batch(SCHEMA).map_err(InfraError::from)?;

    Ok(Arc::new(pool))
}

/// In-memory pool for tests and ephemeral runs.
///
/// Uses a single shared connection so the schema survives across pool
/// checkouts.
///
/// # Errors
/// Returns `StudyflowError::Database` on setup failure.
pub fn open_memory_pool() -> Result<Arc<DbPool>> {
    let manager = SqliteConnectionManager::memory();
    let pool = r2d2::Pool::builder().max_size(1).build(manager).map_err(InfraError::from)?;
    let conn = pool.get().map_err(InfraError::from)?;
    conn.execute_batch(SCHEMA).map_err(InfraError::from)?;
    Ok(Arc::new(pool))
}

pub(crate) fn to_instant(epoch_seconds: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_opt(epoch_seconds, 0)
        .single()
        .ok_or_else(|| StudyflowError::Database(format!("invalid timestamp: {epoch_seconds}")))
}

pub(crate) fn parse_uuid(value: &str) -> Result<uuid::Uuid> {
    value
        .parse::<uuid::Uuid>()
        .map_err(|e| StudyflowError::Database(format!("invalid uuid '{value}': {e}")))
}
