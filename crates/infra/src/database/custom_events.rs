//! SQLite implementation of the CustomEventRepository port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use studyflow_core::CustomEventRepository;
use studyflow_domain::{CalendarProvider, CustomEvent, CustomEventSource, Result, StudyflowError};
use tracing::instrument;

use super::{parse_uuid, to_instant, DbPool};
use crate::errors::InfraError;

/// SQLite implementation of CustomEventRepository
pub struct SqliteCustomEventRepository {
    pool: Arc<DbPool>,
}

impl SqliteCustomEventRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

struct EventRow {
    id: String,
    user_id: String,
    title: String,
    description: Option<String>,
    start_time: i64,
    end_time: i64,
    all_day: bool,
    external_event_id: Option<String>,
    provider: Option<String>,
    source: String,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        start_time: row.get(4)?,
        end_time: row.get(5)?,
        all_day: row.get(6)?,
        external_event_id: row.get(7)?,
        provider: row.get(8)?,
        source: row.get(9)?,
    })
}

fn into_event(row: EventRow) -> Result<CustomEvent> {
    let provider = match row.provider.as_deref() {
        Some(value) => Some(CalendarProvider::parse(value).ok_or_else(|| {
            StudyflowError::Database(format!("unknown calendar provider: {value}"))
        })?),
        None => None,
    };
    let source = CustomEventSource::parse(&row.source)
        .ok_or_else(|| StudyflowError::Database(format!("unknown event source: {}", row.source)))?;

    Ok(CustomEvent {
        id: parse_uuid(&row.id)?,
        user_id: row.user_id,
        title: row.title,
        description: row.description,
        start_time: to_instant(row.start_time)?,
        end_time: to_instant(row.end_time)?,
        all_day: row.all_day,
        external_event_id: row.external_event_id,
        provider,
        source,
    })
}

#[async_trait]
impl CustomEventRepository for SqliteCustomEventRepository {
    #[instrument(skip(self, event), fields(user_id = %event.user_id))]
    async fn insert(&self, event: &CustomEvent) -> Result<()> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        conn.execute(
            "INSERT INTO custom_events (
                id, user_id, title, description, start_time, end_time,
                all_day, external_event_id, provider, source
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                event.id.to_string(),
                event.user_id,
                event.title,
                event.description,
                event.start_time.timestamp(),
                event.end_time.timestamp(),
                event.all_day,
                event.external_event_id,
                event.provider.map(CalendarProvider::as_str),
                event.source.as_str(),
            ],
        )
        .map_err(InfraError::from)?;
        Ok(())
    }

    async fn list_in_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CustomEvent>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let mut stmt = conn
            .prepare(
                "SELECT id, user_id, title, description, start_time, end_time,
                        all_day, external_event_id, provider, source
                 FROM custom_events
                 WHERE user_id = ?1 AND start_time < ?3 AND end_time > ?2
                 ORDER BY start_time ASC",
            )
            .map_err(InfraError::from)?;

        let rows = stmt
            .query_map(params![user_id, start.timestamp(), end.timestamp()], read_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        rows.into_iter().map(into_event).collect()
    }
}
