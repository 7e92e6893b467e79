use crate::utils::constants::QUARTER_HOUR_SECS;
use chrono::{NaiveDateTime, TimeDelta, Timelike};
use chrono_tz::Tz;

/// Civil calendar the raw exports are recorded in.
pub const CIVIL_TZ: Tz = chrono_tz::Europe::Zurich;

pub fn quarter_hour() -> TimeDelta {
    TimeDelta::seconds(QUARTER_HOUR_SECS)
}

/// Floor a naive timestamp to the enclosing 15-minute boundary
pub fn floor_to_quarter(ts: NaiveDateTime) -> NaiveDateTime {
    let rem = ts.and_utc().timestamp().rem_euclid(QUARTER_HOUR_SECS);
    ts - TimeDelta::seconds(rem) - TimeDelta::nanoseconds(i64::from(ts.nanosecond()))
}

/// Ceil a naive timestamp to the next 15-minute boundary, aligned timestamps are unchanged
pub fn ceil_to_quarter(ts: NaiveDateTime) -> NaiveDateTime {
    let floored = floor_to_quarter(ts);
    if floored == ts {
        ts
    } else {
        floored + quarter_hour()
    }
}

pub fn is_quarter_aligned(ts: NaiveDateTime) -> bool {
    floor_to_quarter(ts) == ts
}
