//! ICS export
//!
//! Serializes study sessions to a `text/calendar` document. The subscribable
//! variant adds feed properties and a stable per-event UID so external
//! calendar apps can poll the feed.

use chrono::{DateTime, Utc};
use studyflow_domain::constants::ICS_REFRESH_INTERVAL;
use studyflow_domain::{SessionStatus, StudySession};

/// Serialize sessions to a plain ICS document.
#[must_use]
pub fn export_sessions(sessions: &[StudySession]) -> String {
    let mut out = String::new();
    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, "PRODID:-//Studyflow//Study Planner//ES");
    for session in sessions {
        push_event(&mut out, session, &session.id.to_string());
    }
    push_line(&mut out, "END:VCALENDAR");
    out
}

/// Serialize sessions to a subscribable ICS feed.
///
/// Adds `X-WR-CALNAME`, `REFRESH-INTERVAL` and `X-PUBLISHED-TTL`, and uses a
/// stable `{sessionId}@{uid_domain}` UID per event.
#[must_use]
pub fn export_subscribable(
    sessions: &[StudySession],
    calendar_name: &str,
    uid_domain: &str,
) -> String {
    let mut out = String::new();
    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, "PRODID:-//Studyflow//Study Planner//ES");
    push_line(&mut out, &format!("X-WR-CALNAME:{}", escape_text(calendar_name)));
    push_line(&mut out, &format!("REFRESH-INTERVAL;VALUE=DURATION:{ICS_REFRESH_INTERVAL}"));
    push_line(&mut out, &format!("X-PUBLISHED-TTL:{ICS_REFRESH_INTERVAL}"));
    for session in sessions {
        let uid = format!("{}@{uid_domain}", session.id);
        push_event(&mut out, session, &uid);
    }
    push_line(&mut out, "END:VCALENDAR");
    out
}

fn push_event(out: &mut String, session: &StudySession, uid: &str) {
    push_line(out, "BEGIN:VEVENT");
    push_line(out, &format!("UID:{uid}"));
    push_line(out, &format!("DTSTART:{}", format_utc(session.start_time)));
    push_line(out, &format!("DTEND:{}", format_utc(session.end_time)));
    push_line(out, &format!("SUMMARY:{}", escape_text(&session.title)));
    if !session.description.is_empty() {
        push_line(out, &format!("DESCRIPTION:{}", escape_text(&session.description)));
    }
    push_line(out, &format!("STATUS:{}", status_value(session.status)));
    push_line(out, "END:VEVENT");
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push_str("\r\n");
}

fn format_utc(instant: DateTime<Utc>) -> String {
    instant.format("%Y%m%dT%H%M%SZ").to_string()
}

const fn status_value(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::Completed => "CONFIRMED",
        SessionStatus::Cancelled | SessionStatus::Skipped => "CANCELLED",
        SessionStatus::Planned => "TENTATIVE",
    }
}

/// Escape text per RFC 5545: backslash first, then separators and newlines.
fn escape_text(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(',', "\\,")
        .replace(';', "\\;")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use uuid::Uuid;

    use super::*;

    fn session(title: &str, status: SessionStatus) -> StudySession {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap();
        StudySession {
            id: Uuid::new_v4(),
            user_id: "user-1".to_string(),
            plan_id: None,
            title: title.to_string(),
            description: "Sesión de estudio".to_string(),
            start_time: start,
            end_time: Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap(),
            status,
            recurrence: None,
            external_event_id: None,
            calendar_provider: None,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn test_document_framing_and_timestamps() {
        let ics = export_sessions(&[session("Repaso", SessionStatus::Planned)]);
        assert!(ics.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
        assert!(ics.contains("DTSTART:20240304T080000Z"));
        assert!(ics.contains("DTEND:20240304T100000Z"));
    }

    #[test]
    fn test_summary_escaping() {
        let ics = export_sessions(&[session("A, B; C", SessionStatus::Planned)]);
        assert!(ics.contains("SUMMARY:A\\, B\\; C"));
        for line in ics.lines().filter(|l| l.starts_with("SUMMARY:")) {
            assert!(!line.replace("\\,", "").contains(','));
            assert!(!line.replace("\\;", "").contains(';'));
        }
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (SessionStatus::Completed, "STATUS:CONFIRMED"),
            (SessionStatus::Cancelled, "STATUS:CANCELLED"),
            (SessionStatus::Skipped, "STATUS:CANCELLED"),
            (SessionStatus::Planned, "STATUS:TENTATIVE"),
        ];
        for (status, expected) in cases {
            let ics = export_sessions(&[session("s", status)]);
            assert!(ics.contains(expected), "{status:?} should map to {expected}");
        }
    }

    #[test]
    fn test_subscribable_feed_properties_and_uid() {
        let s = session("Repaso", SessionStatus::Planned);
        let uid = format!("UID:{}@studyflow.app", s.id);
        let ics = export_subscribable(&[s], "Studyflow", "studyflow.app");
        assert!(ics.contains("X-WR-CALNAME:Studyflow"));
        assert!(ics.contains("REFRESH-INTERVAL;VALUE=DURATION:PT1H"));
        assert!(ics.contains("X-PUBLISHED-TTL:PT1H"));
        assert!(ics.contains(&uid));
    }
}
