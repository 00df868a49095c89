//! SQLite implementation of the NotificationRepository port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::params;
use studyflow_core::NotificationRepository;
use studyflow_domain::{Notification, NotificationKind, Result};
use tracing::instrument;

use super::DbPool;
use crate::errors::InfraError;

/// SQLite implementation of NotificationRepository
pub struct SqliteNotificationRepository {
    pool: Arc<DbPool>,
}

impl SqliteNotificationRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for SqliteNotificationRepository {
    #[instrument(skip(self, notification), fields(user_id = %notification.user_id, kind = notification.kind.as_str()))]
    async fn insert(&self, notification: &Notification) -> Result<()> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        conn.execute(
            "INSERT INTO notifications (id, user_id, kind, title, body, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                notification.id.to_string(),
                notification.user_id,
                notification.kind.as_str(),
                notification.title,
                notification.body,
                notification.created_at.timestamp(),
            ],
        )
        .map_err(InfraError::from)?;
        Ok(())
    }

    async fn exists_since(
        &self,
        user_id: &str,
        kind: &NotificationKind,
        since: DateTime<Utc>,
    ) -> Result<bool> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM notifications
                 WHERE user_id = ?1 AND kind = ?2 AND created_at >= ?3",
                params![user_id, kind.as_str(), since.timestamp()],
                |row| row.get(0),
            )
            .map_err(InfraError::from)?;
        Ok(count > 0)
    }
}
