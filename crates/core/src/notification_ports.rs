//! Persistence port for notifications

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use studyflow_domain::{Notification, NotificationKind, Result};

/// Notification storage with the existence probe the dedup check needs
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn insert(&self, notification: &Notification) -> Result<()>;

    /// Whether a (user, kind) notification exists with
    /// `created_at >= since`.
    async fn exists_since(
        &self,
        user_id: &str,
        kind: &NotificationKind,
        since: DateTime<Utc>,
    ) -> Result<bool>;
}
