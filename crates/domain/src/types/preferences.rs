//! Study preferences and plans
//!
//! Two drivers feed session generation: wholesale-saved weekly preferences
//! (coarse time of day) and explicit study plans (concrete time blocks).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Coarse time-of-day preference, mapped to a canonical clock block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "morning" => Some(Self::Morning),
            "afternoon" => Some(Self::Afternoon),
            "evening" => Some(Self::Evening),
            "night" => Some(Self::Night),
            _ => None,
        }
    }
}

/// Unparsed "HH:MM" block boundaries, as stored on a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBlockSpec {
    pub start: String,
    pub end: String,
}

/// A resolved clock-time block with its derived duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBlock {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub duration_minutes: u32,
}

/// Weekly study preferences, one row per user
///
/// Weekdays are Monday-based (1=Mon .. 7=Sun). The weekday set being
/// non-empty is enforced by the saving caller, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyPreferences {
    pub user_id: String,
    pub days_of_week: Vec<u8>,
    pub time_of_day: TimeOfDay,
    pub session_minutes: u32,
    pub timezone: String,
    pub updated_at: DateTime<Utc>,
}

/// Explicit study plan with concrete time blocks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyPlan {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub time_blocks: Vec<TimeBlockSpec>,
    pub days_of_week: Vec<u8>,
    pub weekly_hours: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
