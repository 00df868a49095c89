//! SQLite implementation of the IntegrationRepository port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use studyflow_core::IntegrationRepository;
use studyflow_domain::{CalendarIntegration, CalendarProvider, Result, StudyflowError};
use tracing::instrument;
use uuid::Uuid;

use super::{parse_uuid, to_instant, DbPool};
use crate::errors::InfraError;

/// SQLite implementation of IntegrationRepository
pub struct SqliteIntegrationRepository {
    pool: Arc<DbPool>,
}

impl SqliteIntegrationRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

struct IntegrationRow {
    id: String,
    user_id: String,
    provider: String,
    access_token: String,
    refresh_token: Option<String>,
    expires_at: i64,
    scope: Option<String>,
    created_at: i64,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<IntegrationRow> {
    Ok(IntegrationRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        provider: row.get(2)?,
        access_token: row.get(3)?,
        refresh_token: row.get(4)?,
        expires_at: row.get(5)?,
        scope: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn into_integration(row: IntegrationRow) -> Result<CalendarIntegration> {
    let provider = CalendarProvider::parse(&row.provider).ok_or_else(|| {
        StudyflowError::Database(format!("unknown calendar provider: {}", row.provider))
    })?;

    Ok(CalendarIntegration {
        id: parse_uuid(&row.id)?,
        user_id: row.user_id,
        provider,
        access_token: row.access_token,
        refresh_token: row.refresh_token,
        expires_at: to_instant(row.expires_at)?,
        scope: row.scope,
        created_at: to_instant(row.created_at)?,
    })
}

#[async_trait]
impl IntegrationRepository for SqliteIntegrationRepository {
    #[instrument(skip(self, integration), fields(user_id = %integration.user_id, provider = %integration.provider))]
    async fn upsert(&self, integration: &CalendarIntegration) -> Result<()> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        conn.execute(
            "INSERT INTO calendar_integrations (
                id, user_id, provider, access_token, refresh_token,
                expires_at, scope, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(user_id, provider) DO UPDATE SET
                access_token = excluded.access_token,
                refresh_token = excluded.refresh_token,
                expires_at = excluded.expires_at,
                scope = excluded.scope",
            params![
                integration.id.to_string(),
                integration.user_id,
                integration.provider.as_str(),
                integration.access_token,
                integration.refresh_token,
                integration.expires_at.timestamp(),
                integration.scope,
                integration.created_at.timestamp(),
            ],
        )
        .map_err(InfraError::from)?;
        Ok(())
    }

    async fn list_active(&self, user_id: &str) -> Result<Vec<CalendarIntegration>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let mut stmt = conn
            .prepare(
                "SELECT id, user_id, provider, access_token, refresh_token,
                        expires_at, scope, created_at
                 FROM calendar_integrations
                 WHERE user_id = ?1
                 ORDER BY created_at ASC, id ASC",
            )
            .map_err(InfraError::from)?;

        let rows = stmt
            .query_map(params![user_id], read_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        rows.into_iter().map(into_integration).collect()
    }

    #[instrument(skip(self, access_token, refresh_token))]
    async fn update_tokens(
        &self,
        id: Uuid,
        access_token: &str,
        refresh_token: Option<&str>,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let changed = conn
            .execute(
                "UPDATE calendar_integrations SET
                    access_token = ?2,
                    refresh_token = COALESCE(?3, refresh_token),
                    expires_at = ?4
                 WHERE id = ?1",
                params![id.to_string(), access_token, refresh_token, expires_at.timestamp()],
            )
            .map_err(InfraError::from)?;

        if changed == 0 {
            return Err(StudyflowError::NotFound(format!("integration {id}")));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(provider = %provider))]
    async fn delete(&self, user_id: &str, provider: CalendarProvider) -> Result<()> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        conn.execute(
            "DELETE FROM calendar_integrations WHERE user_id = ?1 AND provider = ?2",
            params![user_id, provider.as_str()],
        )
        .map_err(InfraError::from)?;
        Ok(())
    }
}
