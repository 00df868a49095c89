//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Scheduling
pub const DEFAULT_GENERATION_WEEKS: u32 = 4;
pub const DEFAULT_SESSION_MINUTES: u32 = 60;
pub const AUTO_GENERATED_SESSION_TITLE: &str = "Sesión de estudio";

/// Marker substring placed in the description of generated sessions.
/// Bulk regeneration cleanup matches on this verbatim, so it must never
/// change between releases.
pub const AUTO_GENERATED_MARKER: &str = "programada automáticamente";

// Canonical coarse time-of-day blocks, "HH:MM" clock times
pub const MORNING_BLOCK: (&str, &str) = ("08:00", "10:00");
pub const AFTERNOON_BLOCK: (&str, &str) = ("14:00", "16:00");
pub const EVENING_BLOCK: (&str, &str) = ("18:00", "20:00");
pub const NIGHT_BLOCK: (&str, &str) = ("20:00", "22:00");

// Token lifecycle
pub const TOKEN_REFRESH_BUFFER_SECONDS: i64 = 300;

// Notification dedup windows
pub const LOGIN_SUCCESS_DEDUP_SECONDS: i64 = 300;
pub const LOGIN_FAILED_DEDUP_SECONDS: i64 = 60;
pub const PASSWORD_CHANGED_DEDUP_SECONDS: i64 = 60;
pub const EMAIL_VERIFIED_DEDUP_SECONDS: i64 = 60;

// ICS export
pub const ICS_UID_DOMAIN: &str = "studyflow.app";
pub const ICS_CALENDAR_NAME: &str = "Studyflow";
pub const ICS_REFRESH_INTERVAL: &str = "PT1H";
