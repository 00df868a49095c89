//! Event reconciliation
//!
//! Folds the three event sources (external calendar events, generated study
//! sessions, user-authored custom events) into one deduplicated list. An
//! external event already claimed by a local record is dropped so each
//! real-world event appears exactly once.

use std::collections::HashSet;

use studyflow_domain::{
    CalendarProvider, CustomEvent, EventOrigin, EventSource, ExternalCalendarEvent,
    MergedCalendarEvent, StudySession,
};

/// Strip a recurrence-instance suffix from a provider event id.
///
/// Recurring-instance ids observed in the wild take the form
/// `<baseId>_<suffix>`; comparison uses the substring before the first
/// underscore. Idempotent. No other separator conventions are special-cased.
#[must_use]
pub fn normalize_event_id(id: &str) -> &str {
    id.split('_').next().unwrap_or(id)
}

/// Merge the three event sources into one deduplicated display list.
#[must_use]
pub fn merge_events(
    external: Vec<ExternalCalendarEvent>,
    sessions: Vec<StudySession>,
    custom: Vec<CustomEvent>,
) -> Vec<MergedCalendarEvent> {
    let session_claims: HashSet<&str> = sessions
        .iter()
        .filter_map(|s| s.external_event_id.as_deref())
        .map(normalize_event_id)
        .collect();
    let custom_claims: HashSet<&str> = custom
        .iter()
        .filter_map(|e| e.external_event_id.as_deref())
        .map(normalize_event_id)
        .collect();

    let mut merged = Vec::with_capacity(external.len() + sessions.len() + custom.len());

    for event in &external {
        let normalized = normalize_event_id(&event.id);
        if session_claims.contains(normalized) || custom_claims.contains(normalized) {
            continue;
        }
        merged.push(from_external(event));
    }
    for session in &sessions {
        merged.push(from_session(session));
    }
    for event in &custom {
        merged.push(from_custom(event));
    }
    merged
}

fn from_external(event: &ExternalCalendarEvent) -> MergedCalendarEvent {
    MergedCalendarEvent {
        id: event.id.clone(),
        title: event.title.clone().unwrap_or_default(),
        description: event.description.clone(),
        start: event.start,
        end: event.end,
        all_day: event.all_day,
        source: EventSource::Calendar,
        provider: event.provider.into(),
        local_event_id: None,
        external_event_id: Some(event.id.clone()),
        google_event_id: (event.provider == CalendarProvider::Google).then(|| event.id.clone()),
    }
}

fn from_session(session: &StudySession) -> MergedCalendarEvent {
    MergedCalendarEvent {
        id: session.id.to_string(),
        title: session.title.clone(),
        description: Some(session.description.clone()),
        start: session.start_time,
        end: session.end_time,
        all_day: false,
        source: EventSource::StudySession,
        provider: EventOrigin::Study,
        local_event_id: Some(session.id.to_string()),
        external_event_id: session.external_event_id.clone(),
        google_event_id: (session.calendar_provider == Some(CalendarProvider::Google))
            .then(|| session.external_event_id.clone())
            .flatten(),
    }
}

fn from_custom(event: &CustomEvent) -> MergedCalendarEvent {
    MergedCalendarEvent {
        id: event.id.to_string(),
        title: event.title.clone(),
        description: event.description.clone(),
        start: event.start_time,
        end: event.end_time,
        all_day: event.all_day,
        source: EventSource::Calendar,
        provider: event.provider.map_or(EventOrigin::Local, EventOrigin::from),
        local_event_id: Some(event.id.to_string()),
        external_event_id: event.external_event_id.clone(),
        google_event_id: (event.provider == Some(CalendarProvider::Google))
            .then(|| event.external_event_id.clone())
            .flatten(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use studyflow_domain::{CustomEventSource, SessionStatus};
    use uuid::Uuid;

    use super::*;

    fn external(id: &str, provider: CalendarProvider) -> ExternalCalendarEvent {
        let now = Utc::now();
        ExternalCalendarEvent {
            id: id.to_string(),
            provider,
            title: Some("External".to_string()),
            description: None,
            start: now,
            end: now + Duration::hours(1),
            all_day: false,
            location: None,
        }
    }

    fn session(external_id: Option<&str>) -> StudySession {
        let now = Utc::now();
        StudySession {
            id: Uuid::new_v4(),
            user_id: "user-1".to_string(),
            plan_id: None,
            title: "Session".to_string(),
            description: "desc".to_string(),
            start_time: now,
            end_time: now + Duration::hours(2),
            status: SessionStatus::Planned,
            recurrence: None,
            external_event_id: external_id.map(str::to_string),
            calendar_provider: external_id.map(|_| CalendarProvider::Google),
            created_at: now,
            updated_at: now,
        }
    }

    fn custom(external_id: Option<&str>) -> CustomEvent {
        let now = Utc::now();
        CustomEvent {
            id: Uuid::new_v4(),
            user_id: "user-1".to_string(),
            title: "Custom".to_string(),
            description: None,
            start_time: now,
            end_time: now + Duration::hours(1),
            all_day: false,
            external_event_id: external_id.map(str::to_string),
            provider: external_id.map(|_| CalendarProvider::Google),
            source: CustomEventSource::UserCreated,
        }
    }

    #[test]
    fn test_normalize_strips_recurrence_suffix() {
        assert_eq!(normalize_event_id("abc123_20240101T090000Z"), "abc123");
        assert_eq!(normalize_event_id("abc123"), "abc123");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_event_id("abc123_20240101T090000Z");
        assert_eq!(normalize_event_id(once), once);
    }

    #[test]
    fn test_session_claim_drops_recurring_instance() {
        let merged = merge_events(
            vec![external("abc123_20240101T090000Z", CalendarProvider::Google)],
            vec![session(Some("abc123"))],
            vec![],
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source, EventSource::StudySession);
        assert_eq!(merged[0].provider, EventOrigin::Study);
    }

    #[test]
    fn test_custom_claim_drops_external() {
        let merged = merge_events(
            vec![external("evt9", CalendarProvider::Microsoft)],
            vec![],
            vec![custom(Some("evt9"))],
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source, EventSource::Calendar);
    }

    #[test]
    fn test_unclaimed_external_is_kept_and_tagged() {
        let merged = merge_events(
            vec![external("free-event", CalendarProvider::Google)],
            vec![session(None)],
            vec![custom(None)],
        );
        assert_eq!(merged.len(), 3);
        let ext = merged.iter().find(|e| e.id == "free-event").unwrap();
        assert_eq!(ext.provider, EventOrigin::Google);
        assert_eq!(ext.google_event_id.as_deref(), Some("free-event"));
        let local = merged.iter().find(|e| e.source == EventSource::Calendar && e.id != "free-event").unwrap();
        assert_eq!(local.provider, EventOrigin::Local);
    }
}
