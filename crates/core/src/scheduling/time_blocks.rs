//! Time-block resolution
//!
//! Converts a coarse time-of-day preference or an explicit block list into
//! concrete `(start, end)` clock pairs with a derived duration in minutes.
//! Pure and total over valid "HH:MM" input; malformed strings error.

use chrono::{NaiveTime, Timelike};
use studyflow_domain::constants::{
    AFTERNOON_BLOCK, DEFAULT_SESSION_MINUTES, EVENING_BLOCK, MORNING_BLOCK, NIGHT_BLOCK,
};
use studyflow_domain::{Result, StudyflowError, TimeBlock, TimeBlockSpec, TimeOfDay};

/// Parse an "HH:MM" clock string.
///
/// # Errors
/// Returns `MalformedTimeBlock` if the string does not parse.
pub fn parse_clock(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| StudyflowError::MalformedTimeBlock(value.to_string()))
}

fn minutes_since_midnight(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}

/// Resolve one explicit block.
///
/// Duration is `end − start` in minutes since midnight. A caller-supplied
/// target duration overrides only a zero/negative computed duration, never a
/// valid explicit block; with no target, the default session length applies.
///
/// # Errors
/// Returns `MalformedTimeBlock` if either boundary is unparseable.
pub fn resolve_block(spec: &TimeBlockSpec, target_minutes: Option<u32>) -> Result<TimeBlock> {
    let start = parse_clock(&spec.start)?;
    let end = parse_clock(&spec.end)?;

    let computed = minutes_since_midnight(end) - minutes_since_midnight(start);
    let duration_minutes = if computed > 0 {
        computed.unsigned_abs() as u32
    } else {
        target_minutes.unwrap_or(DEFAULT_SESSION_MINUTES)
    };

    Ok(TimeBlock { start, end, duration_minutes })
}

/// Resolve an explicit block list, preserving order.
///
/// # Errors
/// Fails on the first malformed block.
pub fn resolve_blocks(specs: &[TimeBlockSpec], target_minutes: Option<u32>) -> Result<Vec<TimeBlock>> {
    specs.iter().map(|spec| resolve_block(spec, target_minutes)).collect()
}

/// Resolve the canonical block for a coarse time-of-day preference.
///
/// # Errors
/// Never fails in practice; the canonical boundaries are well-formed.
pub fn blocks_for_time_of_day(
    time_of_day: TimeOfDay,
    target_minutes: Option<u32>,
) -> Result<Vec<TimeBlock>> {
    let (start, end) = match time_of_day {
        TimeOfDay::Morning => MORNING_BLOCK,
        TimeOfDay::Afternoon => AFTERNOON_BLOCK,
        TimeOfDay::Evening => EVENING_BLOCK,
        TimeOfDay::Night => NIGHT_BLOCK,
    };
    let spec = TimeBlockSpec { start: start.to_string(), end: end.to_string() };
    Ok(vec![resolve_block(&spec, target_minutes)?])
}
