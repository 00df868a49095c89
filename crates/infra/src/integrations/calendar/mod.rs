//! Calendar provider integration
//!
//! Token lifecycle management, provider event clients and the sync
//! orchestrator that fans sessions out across active integrations.

pub mod oauth;
pub mod providers;
pub mod sync;

pub use oauth::TokenLifecycleManager;
pub use providers::{create_client, CalendarApi, GoogleCalendarClient, MicrosoftCalendarClient};
pub use sync::{CalendarSyncService, DeleteOutcome, PushOutcome, SyncFailure};
