//! Study sessions
//!
//! The unit of generated work. Duration is always derived from the
//! timestamps, never stored independently.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::AUTO_GENERATED_MARKER;
use crate::types::integration::CalendarProvider;

/// Session lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Planned,
    Completed,
    Cancelled,
    Skipped,
}

impl SessionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Skipped => "skipped",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "planned" => Some(Self::Planned),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            "skipped" => Some(Self::Skipped),
            _ => None,
        }
    }
}

/// Recurrence frequency; only weekly schedules are generated today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceFrequency {
    Weekly,
}

/// Recurrence descriptor attached to generated sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub frequency: RecurrenceFrequency,
    pub interval: u32,
    pub days_of_week: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<NaiveDate>,
}

impl Recurrence {
    /// Weekly recurrence with interval 1 over the given weekday set.
    #[must_use]
    pub fn weekly(days_of_week: Vec<u8>) -> Self {
        Self { frequency: RecurrenceFrequency::Weekly, interval: 1, days_of_week, until: None }
    }
}

/// A persisted study session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudySession {
    pub id: Uuid,
    pub user_id: String,
    pub plan_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: SessionStatus,
    pub recurrence: Option<Recurrence>,
    /// Primary mirror: external event id on `calendar_provider`. Both are
    /// set together or not at all.
    pub external_event_id: Option<String>,
    pub calendar_provider: Option<CalendarProvider>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StudySession {
    /// Derived length in minutes; `end_time > start_time` is a persistence
    /// invariant so this is non-negative in practice.
    #[must_use]
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }

    /// Whether this session was produced by the recurrence expander.
    #[must_use]
    pub fn is_auto_generated(&self) -> bool {
        self.description.contains(AUTO_GENERATED_MARKER)
    }
}

/// An in-memory session not yet persisted, produced by the recurrence
/// expander
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDraft {
    pub user_id: String,
    pub plan_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub recurrence: Recurrence,
}
