//! Windows FILETIME conversion.
//!
//! A FILETIME counts 100-nanosecond ticks since 1601-01-01 00:00:00 UTC.
//! Conversion keeps full tick precision so a decoded timestamp can be turned
//! back into the exact on-disk value.

use chrono::{DateTime, Utc};

use crate::recyclebin::constants::*;

/// Convert a FILETIME tick count to a UTC timestamp.
///
/// Returns `None` only when the instant is outside chrono's representable
/// range.
pub fn filetime_to_datetime(filetime: i64) -> Option<DateTime<Utc>> {
    let seconds = filetime.div_euclid(FILETIME_TICKS_PER_SECOND);
    let ticks = filetime.rem_euclid(FILETIME_TICKS_PER_SECOND);
    let unix_seconds = seconds - FILETIME_UNIX_EPOCH_SECONDS;
    DateTime::from_timestamp(unix_seconds, (ticks * FILETIME_NANOS_PER_TICK) as u32)
}

/// Convert a UTC timestamp back to a FILETIME tick count.
///
/// Sub-tick nanoseconds are truncated.
pub fn datetime_to_filetime(dt: &DateTime<Utc>) -> i64 {
    let seconds = dt.timestamp() + FILETIME_UNIX_EPOCH_SECONDS;
    let ticks = i64::from(dt.timestamp_subsec_nanos()) / FILETIME_NANOS_PER_TICK;
    seconds * FILETIME_TICKS_PER_SECOND + ticks
}
