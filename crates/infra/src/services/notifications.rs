//! Notification recording with duplicate suppression
//!
//! System notification kinds carry a suppression window; a second
//! notification of the same kind for the same user inside the window is
//! rejected. The existence probe fails open: if it errors, the
//! notification is stored anyway.

use std::sync::Arc;

use chrono::Utc;
use studyflow_core::notifications::suppression_window;
use studyflow_core::NotificationRepository;
use studyflow_domain::{Notification, NotificationKind, Result, StudyflowError};
use tracing::{instrument, warn};
use uuid::Uuid;

pub struct NotificationService {
    notifications: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { notifications }
    }

    /// Record a notification unless an identical kind was stored within its
    /// suppression window.
    ///
    /// # Errors
    /// `DuplicateSuppressed` when the window check finds a recent duplicate.
    #[instrument(skip(self, title, body))]
    pub async fn record(
        &self,
        user_id: &str,
        kind: NotificationKind,
        title: &str,
        body: Option<&str>,
    ) -> Result<Notification> {
        let now = Utc::now();
        if let Some(window) = suppression_window(&kind) {
            match self.notifications.exists_since(user_id, &kind, now - window).await {
                Ok(true) => return Err(StudyflowError::DuplicateSuppressed),
                Ok(false) => {}
                Err(error) => {
                    warn!(%error, "dedup probe failed, storing notification anyway");
                }
            }
        }

        let notification = Notification {
            id: Uuid::now_v7(),
            user_id: user_id.to_string(),
            kind,
            title: title.to_string(),
            body: body.map(str::to_string),
            created_at: now,
        };
        self.notifications.insert(&notification).await?;
        Ok(notification)
    }
}
