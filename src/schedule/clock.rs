// src/schedule/clock.rs

use chrono::{DateTime, FixedOffset, TimeDelta, Timelike};

/// Study hours assumed available on each calendar day.
pub const STUDY_HOURS_PER_DAY: u32 = 8;

/// Clock hour of the first daily study slot.
pub const FIRST_SLOT_HOUR: u32 = 9;

pub const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Rounds to one decimal place.
pub fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Start of the next 1-hour slot after `hours_today` slots have been used.
///
/// The slot is placed on `now`'s calendar day (in `now`'s offset) at
/// `FIRST_SLOT_HOUR + hours_today`, then pushed to the following day if it is
/// not strictly in the future.
pub fn next_slot(now: DateTime<FixedOffset>, hours_today: u32) -> DateTime<FixedOffset> {
    let hour = FIRST_SLOT_HOUR + hours_today.min(STUDY_HOURS_PER_DAY - 1);

    let since_midnight = TimeDelta::seconds(i64::from(now.num_seconds_from_midnight()))
        + TimeDelta::nanoseconds(i64::from(now.nanosecond()));
    let slot = now - since_midnight + TimeDelta::hours(i64::from(hour));

    if slot <= now {
        slot + TimeDelta::days(1)
    } else {
        slot
    }
}

/// Formats a countdown as `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_countdown(remaining: TimeDelta) -> String {
    let millis = remaining.num_milliseconds();
    if millis <= 0 {
        return "00:00:00".to_string();
    }

    let hours = millis / 3_600_000;
    let minutes = (millis % 3_600_000) / 60_000;
    let seconds = (millis % 60_000) / 1000;

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
