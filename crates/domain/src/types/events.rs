//! Calendar event views
//!
//! External events are transient read-only projections of provider data;
//! merged events exist only for the duration of a single view render.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::integration::CalendarProvider;

/// An event fetched from an external provider, tagged with its origin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalCalendarEvent {
    pub id: String,
    pub provider: CalendarProvider,
    pub title: Option<String>,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
    pub location: Option<String>,
}

/// Where a user-authored local event came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomEventSource {
    UserCreated,
    CalendarSync,
}

impl CustomEventSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UserCreated => "user_created",
            Self::CalendarSync => "calendar_sync",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user_created" => Some(Self::UserCreated),
            "calendar_sync" => Some(Self::CalendarSync),
            _ => None,
        }
    }
}

/// A user-authored local event, optionally mirrored to a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomEvent {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub all_day: bool,
    pub external_event_id: Option<String>,
    pub provider: Option<CalendarProvider>,
    pub source: CustomEventSource,
}

/// Record-type tag on a merged event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    Calendar,
    StudySession,
}

/// Origin tag on a merged event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOrigin {
    Google,
    Microsoft,
    Study,
    Local,
}

impl From<CalendarProvider> for EventOrigin {
    fn from(provider: CalendarProvider) -> Self {
        match provider {
            CalendarProvider::Google => Self::Google,
            CalendarProvider::Microsoft => Self::Microsoft,
        }
    }
}

/// The reconciler's output: one entry per real-world event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergedCalendarEvent {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
    pub source: EventSource,
    pub provider: EventOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_event_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_event_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_event_id: Option<String>,
}
