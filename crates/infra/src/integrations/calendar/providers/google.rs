//! Google Calendar provider implementation

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use studyflow_domain::{
    CalendarProvider, ExternalCalendarEvent, Result, StudyflowError, StudySession,
};
use tracing::warn;

use super::traits::CalendarApi;
use crate::errors::InfraError;

const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Google Calendar client over the raw REST API
#[derive(Clone)]
pub struct GoogleCalendarClient {
    client: Client,
    base_url: String,
}

impl GoogleCalendarClient {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, GOOGLE_CALENDAR_API_BASE)
    }

    /// Client against a non-default API base, used by tests.
    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self { client, base_url: base_url.into() }
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/primary/events", self.base_url)
    }
}

fn request_failed(operation: &str, status: reqwest::StatusCode, body: String) -> StudyflowError {
    StudyflowError::ProviderRequestFailed {
        provider: CalendarProvider::Google,
        operation: operation.to_string(),
        response_body: format!("({status}) {body}"),
    }
}

fn event_payload(session: &StudySession) -> GoogleEventPayload {
    GoogleEventPayload {
        summary: session.title.clone(),
        description: session.description.clone(),
        start: GoogleEventTime {
            date_time: session.start_time.to_rfc3339_opts(SecondsFormat::Secs, true),
            time_zone: "UTC".to_string(),
        },
        end: GoogleEventTime {
            date_time: session.end_time.to_rfc3339_opts(SecondsFormat::Secs, true),
            time_zone: "UTC".to_string(),
        },
    }
}

#[async_trait]
impl CalendarApi for GoogleCalendarClient {
    fn provider(&self) -> CalendarProvider {
        CalendarProvider::Google
    }

    async fn create_event(&self, access_token: &str, session: &StudySession) -> Result<String> {
        let response = self
            .client
            .post(self.events_url())
            .bearer_auth(access_token)
            .json(&event_payload(session))
            .send()
            .await
            .map_err(InfraError::from)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(request_failed("create", status, body));
        }

        let created: GoogleEventResponse = response.json().await.map_err(InfraError::from)?;
        Ok(created.id)
    }

    async fn update_event(
        &self,
        access_token: &str,
        session: &StudySession,
        event_id: &str,
    ) -> Result<()> {
        let response = self
            .client
            .put(format!("{}/{}", self.events_url(), event_id))
            .bearer_auth(access_token)
            .json(&event_payload(session))
            .send()
            .await
            .map_err(InfraError::from)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(request_failed("update", status, body));
        }
        Ok(())
    }

    async fn delete_event(&self, access_token: &str, event_id: &str) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}/{}", self.events_url(), event_id))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(InfraError::from)?;

        // A missing event counts as deleted
        if !response.status().is_success() && response.status() != reqwest::StatusCode::NOT_FOUND {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(request_failed("delete", status, body));
        }
        Ok(())
    }

    async fn list_events(
        &self,
        access_token: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ExternalCalendarEvent>> {
        let response = self
            .client
            .get(self.events_url())
            .bearer_auth(access_token)
            .query(&[
                ("timeMin", start.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("timeMax", end.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
                ("maxResults", "100".to_string()),
            ])
            .send()
            .await
            .map_err(InfraError::from)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(request_failed("list", status, body));
        }

        let listed: GoogleEventsResponse = response.json().await.map_err(InfraError::from)?;
        Ok(listed.items.into_iter().filter_map(into_external_event).collect())
    }
}

fn into_external_event(event: GoogleEvent) -> Option<ExternalCalendarEvent> {
    let all_day = event.start.date.is_some();
    let start = parse_event_time(&event.start)?;
    let end = parse_event_time(&event.end)?;
    Some(ExternalCalendarEvent {
        id: event.id,
        provider: CalendarProvider::Google,
        title: event.summary,
        description: event.description,
        start,
        end,
        all_day,
        location: event.location,
    })
}

fn parse_event_time(time: &GoogleEventTimeResponse) -> Option<DateTime<Utc>> {
    if let Some(date_time) = &time.date_time {
        return match DateTime::parse_from_rfc3339(date_time) {
            Ok(parsed) => Some(parsed.with_timezone(&Utc)),
            Err(e) => {
                warn!(value = %date_time, error = %e, "unparseable Google event time, skipping");
                None
            }
        };
    }
    let date = time.date.as_deref()?;
    match date.parse::<NaiveDate>() {
        Ok(parsed) => parsed.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive)),
        Err(e) => {
            warn!(value = %date, error = %e, "unparseable Google event date, skipping");
            None
        }
    }
}

#[derive(Debug, Serialize)]
struct GoogleEventPayload {
    summary: String,
    description: String,
    start: GoogleEventTime,
    end: GoogleEventTime,
}

#[derive(Debug, Serialize)]
struct GoogleEventTime {
    #[serde(rename = "dateTime")]
    date_time: String,
    #[serde(rename = "timeZone")]
    time_zone: String,
}

#[derive(Debug, Deserialize)]
struct GoogleEventResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct GoogleEventsResponse {
    #[serde(default)]
    items: Vec<GoogleEvent>,
}

#[derive(Debug, Deserialize)]
struct GoogleEvent {
    id: String,
    summary: Option<String>,
    description: Option<String>,
    location: Option<String>,
    start: GoogleEventTimeResponse,
    end: GoogleEventTimeResponse,
}

#[derive(Debug, Deserialize)]
struct GoogleEventTimeResponse {
    #[serde(rename = "dateTime")]
    date_time: Option<String>,
    date: Option<String>,
}
