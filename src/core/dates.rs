//! Date resolver: parses `dd/mm/yyyy` input and normalizes the range order.

use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::error::{DivisasError, DivisasResult};
use crate::types::{DateRange, Resolution};

/// chrono format of user-entered dates.
pub const INPUT_FORMAT: &str = "%d/%m/%Y";

/// Compact format used in default filenames.
pub const FILENAME_FORMAT: &str = "%Y%m%d";

/// Parse a single `dd/mm/yyyy` date.
///
/// Only `/` separators are accepted; `31-01-2024` is a format error.
pub fn parse_date(input: &str) -> DivisasResult<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, INPUT_FORMAT).map_err(|_| DivisasError::DateFormat {
        input: trimmed.to_string(),
    })
}

/// Format a date the way the user types it.
pub fn format_date(date: NaiveDate) -> String {
    date.format(INPUT_FORMAT).to_string()
}

/// Parse both ends of a range and put them in order.
///
/// Reversed input is swapped; callers that talk to a user surface
/// `Resolution::swapped` themselves.
pub fn resolve(start: &str, end: &str) -> DivisasResult<Resolution> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;
    Ok(resolve_dates(start, end))
}

/// Same as [`resolve`] for already-parsed dates.
pub fn resolve_dates(start: NaiveDate, end: NaiveDate) -> Resolution {
    let (range, swapped) = DateRange::normalized(start, end);
    if swapped {
        debug!(
            start = %format_date(start),
            end = %format_date(end),
            "reversed input, swapping start and end"
        );
    }
    debug!(%range, "resolved date range");
    Resolution { range, swapped }
}

/// Entry defaults: one week ago and today, as `dd/mm/yyyy`.
pub fn default_entry_dates(today: NaiveDate) -> (String, String) {
    let week_ago = today.checked_sub_days(Days::new(7)).unwrap_or(today);
    (format_date(week_ago), format_date(today))
}
