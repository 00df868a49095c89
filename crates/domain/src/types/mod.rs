//! Domain types and models

pub mod events;
pub mod integration;
pub mod notification;
pub mod preferences;
pub mod session;

pub use events::{
    CustomEvent, CustomEventSource, EventOrigin, EventSource, ExternalCalendarEvent,
    MergedCalendarEvent,
};
pub use integration::{CalendarIntegration, CalendarProvider};
pub use notification::{Notification, NotificationKind};
pub use preferences::{StudyPlan, StudyPreferences, TimeBlock, TimeBlockSpec, TimeOfDay};
pub use session::{Recurrence, RecurrenceFrequency, SessionDraft, SessionStatus, StudySession};
