//! Calendar provider implementations

mod google;
mod microsoft;
mod traits;

pub use google::GoogleCalendarClient;
pub use microsoft::MicrosoftCalendarClient;
pub use traits::{create_client, CalendarApi};
