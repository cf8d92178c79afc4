//! Display formatting helpers.
//!
//! Human-readable byte counts and user-supplied timestamp patterns for the
//! text and CSV reports.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};

use crate::RbinError;

const SIZE_SUFFIXES: [&str; 7] = ["B", "KB", "MB", "GB", "TB", "PB", "EB"];

/// Default `--dt` pattern.
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a byte count with a binary-unit suffix and one decimal place.
///
/// ```
/// use rbin::util::format::format_size;
/// assert_eq!(format_size(0), "0B");
/// assert_eq!(format_size(1536), "1.5KB");
/// assert_eq!(format_size(-2048), "-2KB");
/// ```
pub fn format_size(byte_count: i64) -> String {
    if byte_count == 0 {
        return format!("0{}", SIZE_SUFFIXES[0]);
    }

    let bytes = byte_count.unsigned_abs() as f64;
    let place = (bytes.log(1024.0).floor() as usize).min(SIZE_SUFFIXES.len() - 1);
    let num = (bytes / 1024f64.powi(place as i32) * 10.0).round() / 10.0;
    let sign = if byte_count < 0 { "-" } else { "" };
    format!("{}{}{}", sign, num, SIZE_SUFFIXES[place])
}

/// Check that `pattern` is a usable chrono strftime pattern.
pub fn validate_datetime_format(pattern: &str) -> Result<(), RbinError> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(RbinError::Argument(format!(
            "Invalid date/time format '{}'",
            pattern
        )));
    }
    Ok(())
}

/// Render `dt` (in UTC) with a strftime `pattern`.
pub fn format_timestamp(dt: &DateTime<Utc>, pattern: &str) -> Result<String, RbinError> {
    let mut out = String::new();
    write!(out, "{}", dt.format(pattern)).map_err(|_| {
        RbinError::Argument(format!("Invalid date/time format '{}'", pattern))
    })?;
    Ok(out)
}
