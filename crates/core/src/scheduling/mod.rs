//! Session generation
//!
//! Two pure stages: time-block resolution (coarse preference or explicit
//! "HH:MM" blocks into concrete clock pairs) and recurrence expansion (a
//! day-by-day walk emitting session drafts).

pub mod recurrence;
pub mod time_blocks;
