//! Notification records
//!
//! Only the system kinds carry a dedup window; anything else is stored
//! unconditionally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Notification kind; known system kinds plus free-form application kinds
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    SystemLoginSuccess,
    SystemLoginFailed,
    SystemPasswordChanged,
    SystemEmailVerified,
    Other(String),
}

impl NotificationKind {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::SystemLoginSuccess => "system_login_success",
            Self::SystemLoginFailed => "system_login_failed",
            Self::SystemPasswordChanged => "system_password_changed",
            Self::SystemEmailVerified => "system_email_verified",
            Self::Other(kind) => kind,
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "system_login_success" => Self::SystemLoginSuccess,
            "system_login_failed" => Self::SystemLoginFailed,
            "system_password_changed" => Self::SystemPasswordChanged,
            "system_email_verified" => Self::SystemEmailVerified,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Serialize for NotificationKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NotificationKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

/// A stored notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_string_round_trip() {
        let kinds = [
            NotificationKind::SystemLoginSuccess,
            NotificationKind::SystemLoginFailed,
            NotificationKind::SystemPasswordChanged,
            NotificationKind::SystemEmailVerified,
            NotificationKind::Other("course_published".to_string()),
        ];
        for kind in kinds {
            assert_eq!(NotificationKind::parse(kind.as_str()), kind);
        }
    }
}
