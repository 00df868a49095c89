//! Microsoft Graph calendar provider implementation

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use studyflow_domain::{
    CalendarProvider, ExternalCalendarEvent, Result, StudyflowError, StudySession,
};
use tracing::warn;

use super::traits::CalendarApi;
use crate::errors::InfraError;

const MICROSOFT_GRAPH_API_BASE: &str = "https://graph.microsoft.com/v1.0";

/// Microsoft Graph calendar client
#[derive(Clone)]
pub struct MicrosoftCalendarClient {
    client: Client,
    base_url: String,
}

impl MicrosoftCalendarClient {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, MICROSOFT_GRAPH_API_BASE)
    }

    /// Client against a non-default API base, used by tests.
    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self { client, base_url: base_url.into() }
    }

    fn events_url(&self) -> String {
        format!("{}/me/calendar/events", self.base_url)
    }
}

fn request_failed(operation: &str, status: reqwest::StatusCode, body: String) -> StudyflowError {
    StudyflowError::ProviderRequestFailed {
        provider: CalendarProvider::Microsoft,
        operation: operation.to_string(),
        response_body: format!("({status}) {body}"),
    }
}

fn event_payload(session: &StudySession) -> MicrosoftEventPayload {
    MicrosoftEventPayload {
        subject: session.title.clone(),
        body: MicrosoftEventBody {
            content_type: "HTML".to_string(),
            content: session.description.clone(),
        },
        start: MicrosoftEventTime {
            date_time: session.start_time.to_rfc3339_opts(SecondsFormat::Secs, true),
            time_zone: "UTC".to_string(),
        },
        end: MicrosoftEventTime {
            date_time: session.end_time.to_rfc3339_opts(SecondsFormat::Secs, true),
            time_zone: "UTC".to_string(),
        },
    }
}

#[async_trait]
impl CalendarApi for MicrosoftCalendarClient {
    fn provider(&self) -> CalendarProvider {
        CalendarProvider::Microsoft
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

        let created: MicrosoftEventResponse = response.json().await.map_err(InfraError::from)?;
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
            .patch(format!("{}/{}", self.events_url(), event_id))
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
            .get(format!("{}/me/calendarView", self.base_url))
            .bearer_auth(access_token)
            .header("Prefer", r#"outlook.timezone="UTC""#)
            .query(&[
                ("startDateTime", start.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("endDateTime", end.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("$orderby", "start/dateTime".to_string()),
                ("$top", "100".to_string()),
            ])
            .send()
            .await
            .map_err(InfraError::from)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(request_failed("list", status, body));
        }

        let listed: MicrosoftEventsResponse = response.json().await.map_err(InfraError::from)?;
        Ok(listed.value.into_iter().filter_map(into_external_event).collect())
    }
}

fn into_external_event(event: MicrosoftEvent) -> Option<ExternalCalendarEvent> {
    let start = parse_graph_time(&event.start)?;
    let end = parse_graph_time(&event.end)?;
    Some(ExternalCalendarEvent {
        id: event.id,
        provider: CalendarProvider::Microsoft,
        title: event.subject,
        description: event.body_preview,
        start,
        end,
        all_day: event.is_all_day,
        location: event.location.and_then(|l| l.display_name),
    })
}

/// Graph returns fractional-second naive timestamps in the requested
/// timezone (UTC via the Prefer header), without a trailing Z.
fn parse_graph_time(time: &MicrosoftEventTimeResponse) -> Option<DateTime<Utc>> {
    let value = time.date_time.trim().trim_end_matches('Z');
    match NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(naive) => Some(Utc.from_utc_datetime(&naive)),
        Err(e) => {
            warn!(value = %time.date_time, error = %e, "unparseable Graph event time, skipping");
            None
        }
    }
}

#[derive(Debug, Serialize)]
struct MicrosoftEventPayload {
    subject: String,
    body: MicrosoftEventBody,
    start: MicrosoftEventTime,
    end: MicrosoftEventTime,
}

#[derive(Debug, Serialize)]
struct MicrosoftEventBody {
    #[serde(rename = "contentType")]
    content_type: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct MicrosoftEventTime {
    #[serde(rename = "dateTime")]
    date_time: String,
    #[serde(rename = "timeZone")]
    time_zone: String,
}

#[derive(Debug, Deserialize)]
struct MicrosoftEventResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct MicrosoftEventsResponse {
    #[serde(default)]
    value: Vec<MicrosoftEvent>,
}

#[derive(Debug, Deserialize)]
struct MicrosoftEvent {
    id: String,
    subject: Option<String>,
    #[serde(rename = "bodyPreview")]
    body_preview: Option<String>,
    start: MicrosoftEventTimeResponse,
    end: MicrosoftEventTimeResponse,
    #[serde(rename = "isAllDay", default)]
    is_all_day: bool,
    location: Option<MicrosoftLocation>,
}

#[derive(Debug, Deserialize)]
struct MicrosoftEventTimeResponse {
    #[serde(rename = "dateTime")]
    date_time: String,
}

#[derive(Debug, Deserialize)]
struct MicrosoftLocation {
    #[serde(rename = "displayName")]
    display_name: Option<String>,
}
