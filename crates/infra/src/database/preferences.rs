//! SQLite implementation of the PreferencesRepository port.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::params;
use studyflow_core::PreferencesRepository;
use studyflow_domain::{Result, StudyflowError, StudyPreferences, TimeOfDay};
use tracing::instrument;

use super::{to_instant, DbPool};
use crate::errors::InfraError;

/// SQLite implementation of PreferencesRepository
pub struct SqlitePreferencesRepository {
    pool: Arc<DbPool>,
}

impl SqlitePreferencesRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PreferencesRepository for SqlitePreferencesRepository {
    #[instrument(skip(self, preferences), fields(user_id = %preferences.user_id))]
    async fn upsert(&self, preferences: &StudyPreferences) -> Result<()> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let days = serde_json::to_string(&preferences.days_of_week).map_err(InfraError::from)?;

        conn.execute(
            "INSERT INTO study_preferences (
                user_id, days_of_week, time_of_day, session_minutes, timezone, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(user_id) DO UPDATE SET
                days_of_week = excluded.days_of_week,
                time_of_day = excluded.time_of_day,
                session_minutes = excluded.session_minutes,
                timezone = excluded.timezone,
                updated_at = excluded.updated_at",
            params![
                preferences.user_id,
                days,
                preferences.time_of_day.as_str(),
                preferences.session_minutes,
                preferences.timezone,
                preferences.updated_at.timestamp(),
            ],
        )
        .map_err(InfraError::from)?;
        Ok(())
    }

    async fn find(&self, user_id: &str) -> Result<Option<StudyPreferences>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let mut stmt = conn
            .prepare(
                "SELECT user_id, days_of_week, time_of_day, session_minutes, timezone, updated_at
                 FROM study_preferences WHERE user_id = ?1",
            )
            .map_err(InfraError::from)?;

        let mut rows = stmt
            .query_map(params![user_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, u32>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, i64>(5)?,
                ))
            })
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        let Some((user_id, days, time_of_day, session_minutes, timezone, updated_at)) = rows.pop()
        else {
            return Ok(None);
        };

        let days_of_week: Vec<u8> = serde_json::from_str(&days)
            .map_err(|e| StudyflowError::Database(format!("invalid weekday json: {e}")))?;
        let time_of_day = TimeOfDay::parse(&time_of_day)
            .ok_or_else(|| StudyflowError::Database(format!("unknown time of day: {time_of_day}")))?;

        Ok(Some(StudyPreferences {
            user_id,
            days_of_week,
            time_of_day,
            session_minutes,
            timezone,
            updated_at: to_instant(updated_at)?,
        }))
    }
}
