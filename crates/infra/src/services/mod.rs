//! Application services
//!
//! Orchestration over the core logic and the storage/provider adapters.
//! Each service owns one user-facing workflow and keeps the pure logic in
//! `studyflow-core` free of I/O.

pub mod calendar_view;
pub mod context;
pub mod export;
pub mod integrations;
pub mod notifications;
pub mod planner;

pub use calendar_view::CalendarViewService;
pub use context::AppServices;
pub use export::IcsExportService;
pub use integrations::IntegrationService;
pub use notifications::NotificationService;
pub use planner::{RegenerationSummary, StudyPlannerService};
