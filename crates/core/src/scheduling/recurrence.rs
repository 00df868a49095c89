//! Recurrence expansion
//!
//! Walks a date window day by day and emits one session draft per time block
//! for every day whose weekday is in the allowed set. Output ordering is a
//! contract: day-ascending, then block-list order within a day.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;
use uuid::Uuid;

use studyflow_domain::constants::{AUTO_GENERATED_MARKER, AUTO_GENERATED_SESSION_TITLE};
use studyflow_domain::{Recurrence, SessionDraft, TimeBlock};

/// Inputs for one expansion run
#[derive(Debug, Clone)]
pub struct ExpansionRequest<'a> {
    pub user_id: &'a str,
    pub plan_id: Option<Uuid>,
    /// Allowed weekdays, Monday-based (1=Mon .. 7=Sun).
    pub days_of_week: &'a [u8],
    pub blocks: &'a [TimeBlock],
    pub start_date: NaiveDate,
    pub weeks: u32,
    /// IANA timezone the user schedules in; falls back to UTC if unknown.
    pub timezone: &'a str,
}

/// Expand a request into session drafts over `[start_date, start_date + weeks·7d)`.
///
/// Every draft carries the weekly recurrence descriptor and the
/// auto-generated marker in its description; regeneration callers delete
/// prior marker-bearing planned sessions before calling this again.
#[must_use]
pub fn expand(request: &ExpansionRequest<'_>) -> Vec<SessionDraft> {
    let timezone = resolve_timezone(request.timezone);
    let total_days = i64::from(request.weeks) * 7;
    let description = format!("{AUTO_GENERATED_SESSION_TITLE} {AUTO_GENERATED_MARKER}");
    let recurrence = Recurrence::weekly(request.days_of_week.to_vec());

    let mut drafts = Vec::new();
    for offset in 0..total_days {
        let date = request.start_date + Duration::days(offset);
        // number_from_monday already yields Sunday as 7, never 0
        let weekday = date.weekday().number_from_monday() as u8;
        if !request.days_of_week.contains(&weekday) {
            continue;
        }

        for block in request.blocks {
            let start_time = materialize(date, block, timezone);
            let end_time = start_time + Duration::minutes(i64::from(block.duration_minutes));
            drafts.push(SessionDraft {
                user_id: request.user_id.to_string(),
                plan_id: request.plan_id,
                title: AUTO_GENERATED_SESSION_TITLE.to_string(),
                description: description.clone(),
                start_time,
                end_time,
                recurrence: recurrence.clone(),
            });
        }
    }
    drafts
}

fn resolve_timezone(name: &str) -> Tz {
    name.parse::<Tz>().unwrap_or_else(|_| {
        warn!(timezone = name, "unknown timezone, falling back to UTC");
        Tz::UTC
    })
}

/// Pin a local date + block start to an instant, resolving DST gaps and
/// overlaps via the earliest valid interpretation.
fn materialize(date: NaiveDate, block: &TimeBlock, timezone: Tz) -> DateTime<Utc> {
    let naive = date.and_time(block.start);
    timezone
        .from_local_datetime(&naive)
        .earliest()
        .map_or_else(|| Utc.from_utc_datetime(&naive), |local| local.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveTime, Timelike};
    use studyflow_domain::TimeBlockSpec;

    use super::*;
    use crate::scheduling::time_blocks::resolve_blocks;

    fn block(start: &str, end: &str) -> TimeBlock {
        resolve_blocks(
            &[TimeBlockSpec { start: start.to_string(), end: end.to_string() }],
            None,
        )
        .unwrap()[0]
    }

    fn request<'a>(
        days: &'a [u8],
        blocks: &'a [TimeBlock],
        start: NaiveDate,
        weeks: u32,
    ) -> ExpansionRequest<'a> {
        ExpansionRequest {
            user_id: "user-1",
            plan_id: None,
            days_of_week: days,
            blocks,
            start_date: start,
            weeks,
            timezone: "UTC",
        }
    }

    #[test]
    fn test_count_matches_days_times_weeks_times_blocks() {
        let blocks = [block("08:00", "10:00"), block("18:00", "19:00")];
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(); // a Monday
        let drafts = expand(&request(&[1, 3, 5], &blocks, start, 2));
        assert_eq!(drafts.len(), 3 * 2 * 2);
    }

    #[test]
    fn test_zero_weeks_and_empty_weekday_set_yield_nothing() {
        let blocks = [block("08:00", "10:00")];
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(expand(&request(&[1, 2], &blocks, start, 0)).is_empty());
        assert!(expand(&request(&[], &blocks, start, 4)).is_empty());
    }

    #[test]
    fn test_sessions_land_only_on_allowed_weekdays() {
        let blocks = [block("08:00", "10:00")];
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let drafts = expand(&request(&[2, 4], &blocks, start, 3));
        for draft in &drafts {
            let weekday = draft.start_time.date_naive().weekday().number_from_monday();
            assert!(weekday == 2 || weekday == 4);
        }
    }

    #[test]
    fn test_sunday_is_seven() {
        let blocks = [block("08:00", "10:00")];
        // 2024-01-07 is a Sunday
        let start = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        let drafts = expand(&request(&[7], &blocks, start, 1));
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].start_time.date_naive(), start);
    }

    #[test]
    fn test_end_equals_start_plus_duration() {
        let blocks = [block("09:15", "10:45")];
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        for draft in expand(&request(&[1], &blocks, start, 2)) {
            assert_eq!(draft.end_time - draft.start_time, Duration::minutes(90));
            assert!(draft.end_time > draft.start_time);
        }
    }

    #[test]
    fn test_output_ordered_by_day_then_block() {
        let blocks = [block("18:00", "20:00"), block("08:00", "10:00")];
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let drafts = expand(&request(&[1, 2], &blocks, start, 1));
        assert_eq!(drafts.len(), 4);
        // Monday evening block first (block-list order), then Monday morning
        assert_eq!(drafts[0].start_time.time(), NaiveTime::from_hms_opt(18, 0, 0).unwrap());
        assert_eq!(drafts[1].start_time.time(), NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert!(drafts[1].start_time < drafts[2].start_time);
    }

    #[test]
    fn test_drafts_carry_marker_and_recurrence() {
        let blocks = [block("08:00", "10:00")];
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let drafts = expand(&request(&[1], &blocks, start, 1));
        let draft = &drafts[0];
        assert!(draft.description.contains(AUTO_GENERATED_MARKER));
        assert_eq!(draft.recurrence.interval, 1);
        assert_eq!(draft.recurrence.days_of_week, vec![1]);
    }

    #[test]
    fn test_timezone_materialization() {
        let blocks = [block("08:00", "10:00")];
        // Winter date, Madrid is UTC+1
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut req = request(&[1], &blocks, start, 1);
        req.timezone = "Europe/Madrid";
        let drafts = expand(&req);
        assert_eq!(drafts[0].start_time.hour(), 7);
    }

    #[test]
    fn test_monday_wednesday_friday_morning_scenario() {
        let blocks = [block("08:00", "10:00")];
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(); // Monday
        let drafts = expand(&request(&[1, 3, 5], &blocks, start, 1));
        assert_eq!(drafts.len(), 3);
        for draft in &drafts {
            assert_eq!(draft.start_time.time(), NaiveTime::from_hms_opt(8, 0, 0).unwrap());
            assert_eq!(draft.end_time.time(), NaiveTime::from_hms_opt(10, 0, 0).unwrap());
            assert!(draft.description.contains(AUTO_GENERATED_MARKER));
        }
    }
}
