//! SQLite implementation of the SessionRepository port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use studyflow_core::SessionRepository;
use studyflow_domain::constants::AUTO_GENERATED_MARKER;
use studyflow_domain::{
    CalendarProvider, Recurrence, Result, SessionDraft, SessionStatus, StudyflowError,
    StudySession,
};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{parse_uuid, to_instant, DbPool};
use crate::errors::InfraError;

const SESSION_COLUMNS: &str = "id, user_id, plan_id, title, description, start_time, end_time, \
                               status, recurrence, external_event_id, calendar_provider, \
                               created_at, updated_at";

/// SQLite implementation of SessionRepository
pub struct SqliteSessionRepository {
    pool: Arc<DbPool>,
}

impl SqliteSessionRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

/// Raw row image, converted to the domain type outside the rusqlite closure
struct SessionRow {
    id: String,
    user_id: String,
    plan_id: Option<String>,
    title: String,
    description: String,
    start_time: i64,
    end_time: i64,
    status: String,
    recurrence: Option<String>,
    external_event_id: Option<String>,
    calendar_provider: Option<String>,
    created_at: i64,
    updated_at: i64,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<SessionRow> {
    Ok(SessionRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        plan_id: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        start_time: row.get(5)?,
        end_time: row.get(6)?,
        status: row.get(7)?,
        recurrence: row.get(8)?,
        external_event_id: row.get(9)?,
        calendar_provider: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

fn into_session(row: SessionRow) -> Result<StudySession> {
    let recurrence: Option<Recurrence> = row
        .recurrence
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(|e| StudyflowError::Database(format!("invalid recurrence json: {e}")))?;

    let status = SessionStatus::parse(&row.status)
        .ok_or_else(|| StudyflowError::Database(format!("unknown session status: {}", row.status)))?;

    let calendar_provider = match row.calendar_provider.as_deref() {
        Some(value) => Some(CalendarProvider::parse(value).ok_or_else(|| {
            StudyflowError::Database(format!("unknown calendar provider: {value}"))
        })?),
        None => None,
    };

    Ok(StudySession {
        id: parse_uuid(&row.id)?,
        user_id: row.user_id,
        plan_id: row.plan_id.as_deref().map(parse_uuid).transpose()?,
        title: row.title,
        description: row.description,
        start_time: to_instant(row.start_time)?,
        end_time: to_instant(row.end_time)?,
        status,
        recurrence,
        external_event_id: row.external_event_id,
        calendar_provider,
        created_at: to_instant(row.created_at)?,
        updated_at: to_instant(row.updated_at)?,
    })
}

#[async_trait]
impl SessionRepository for SqliteSessionRepository {
    #[instrument(skip(self, draft), fields(user_id = %draft.user_id))]
    async fn insert(&self, draft: &SessionDraft) -> Result<StudySession> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let now = Utc::now();
        let id = Uuid::new_v4();
        let recurrence = serde_json::to_string(&draft.recurrence).map_err(InfraError::from)?;

        conn.execute(
            "INSERT INTO study_sessions (
                id, user_id, plan_id, title, description, start_time, end_time,
                status, recurrence, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                id.to_string(),
                draft.user_id,
                draft.plan_id.map(|p| p.to_string()),
                draft.title,
                draft.description,
                draft.start_time.timestamp(),
                draft.end_time.timestamp(),
                SessionStatus::Planned.as_str(),
                recurrence,
                now.timestamp(),
                now.timestamp(),
            ],
        )
        .map_err(InfraError::from)?;

        Ok(StudySession {
            id,
            user_id: draft.user_id.clone(),
            plan_id: draft.plan_id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            start_time: draft.start_time,
            end_time: draft.end_time,
            status: SessionStatus::Planned,
            recurrence: Some(draft.recurrence.clone()),
            external_event_id: None,
            calendar_provider: None,
            created_at: now,
            updated_at: now,
        })
    }

    #[instrument(skip(self, session), fields(session_id = %session.id))]
    async fn update(&self, session: &StudySession) -> Result<()> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let recurrence = session
            .recurrence
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(InfraError::from)?;

        let changed = conn
            .execute(
                "UPDATE study_sessions SET
                    title = ?2, description = ?3, start_time = ?4, end_time = ?5,
                    status = ?6, recurrence = ?7, external_event_id = ?8,
                    calendar_provider = ?9, updated_at = ?10
                 WHERE id = ?1",
                params![
                    session.id.to_string(),
                    session.title,
                    session.description,
                    session.start_time.timestamp(),
                    session.end_time.timestamp(),
                    session.status.as_str(),
                    recurrence,
                    session.external_event_id,
                    session.calendar_provider.map(CalendarProvider::as_str),
                    Utc::now().timestamp(),
                ],
            )
            .map_err(InfraError::from)?;

        if changed == 0 {
            return Err(StudyflowError::NotFound(format!("session {}", session.id)));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> Result<()> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        conn.execute("DELETE FROM study_sessions WHERE id = ?1", params![id.to_string()])
            .map_err(InfraError::from)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<StudySession>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let mut stmt = conn
            .prepare(&format!("SELECT {SESSION_COLUMNS} FROM study_sessions WHERE id = ?1"))
            .map_err(InfraError::from)?;

        let mut rows = stmt
            .query_map(params![id.to_string()], read_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        rows.pop().map(into_session).transpose()
    }

    #[instrument(skip(self), fields(user_id))]
    async fn list_in_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StudySession>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {SESSION_COLUMNS} FROM study_sessions
                 WHERE user_id = ?1 AND start_time < ?3 AND end_time > ?2
                 ORDER BY start_time ASC"
            ))
            .map_err(InfraError::from)?;

        let rows = stmt
            .query_map(params![user_id, start.timestamp(), end.timestamp()], read_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        rows.into_iter().map(into_session).collect()
    }

    #[instrument(skip(self), fields(user_id))]
    async fn delete_auto_generated_after(
        &self,
        user_id: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<StudySession>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let marker = format!("%{AUTO_GENERATED_MARKER}%");

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {SESSION_COLUMNS} FROM study_sessions
                 WHERE user_id = ?1 AND status = 'planned'
                   AND start_time >= ?2 AND description LIKE ?3
                 ORDER BY start_time ASC"
            ))
            .map_err(InfraError::from)?;

        let rows = stmt
            .query_map(params![user_id, cutoff.timestamp(), marker], read_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;
        drop(stmt);

        let deleted = conn
            .execute(
                "DELETE FROM study_sessions
                 WHERE user_id = ?1 AND status = 'planned'
                   AND start_time >= ?2 AND description LIKE ?3",
                params![user_id, cutoff.timestamp(), marker],
            )
            .map_err(InfraError::from)?;

        debug!(user_id, deleted, "removed auto-generated sessions before regeneration");

        rows.into_iter().map(into_session).collect()
    }

    #[instrument(skip(self), fields(provider = %provider))]
    async fn set_external_ref(
        &self,
        id: Uuid,
        provider: CalendarProvider,
        external_id: &str,
    ) -> Result<()> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let changed = conn
            .execute(
                "UPDATE study_sessions
                 SET external_event_id = ?2, calendar_provider = ?3, updated_at = ?4
                 WHERE id = ?1",
                params![id.to_string(), external_id, provider.as_str(), Utc::now().timestamp()],
            )
            .map_err(InfraError::from)?;

        if changed == 0 {
            return Err(StudyflowError::NotFound(format!("session {id}")));
        }
        Ok(())
    }
}
