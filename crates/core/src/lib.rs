//! # Studyflow Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Session generation (time-block expansion, recurrence expansion)
//! - Event reconciliation across the three event sources
//! - Notification dedup policy
//! - ICS export
//! - Port/adapter interfaces (traits)
//!
//! ## Architecture Principles
//! - Only depends on `studyflow-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod ics;
pub mod notifications;
pub mod reconcile;
pub mod scheduling;

// Infrastructure ports
pub mod calendar_ports;
pub mod notification_ports;
pub mod planning_ports;

pub use calendar_ports::{CustomEventRepository, IntegrationRepository};
pub use notification_ports::NotificationRepository;
pub use planning_ports::{PreferencesRepository, SessionRepository};
pub use reconcile::{merge_events, normalize_event_id};
pub use scheduling::recurrence::{expand, ExpansionRequest};
pub use scheduling::time_blocks::{blocks_for_time_of_day, resolve_blocks};
