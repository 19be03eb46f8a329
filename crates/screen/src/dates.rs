use chrono::{NaiveDate, NaiveDateTime, Timelike};

use crate::error::ScreenError;
use crate::model::PersonRecord;

const DATE_TIME_BOUND: &str = "%d/%m/%Y %H:%M";
const DATE_BOUND: &str = "%d/%m/%Y";

/// Parse a range bound.
///
/// A bound containing `:` must be `DD/MM/YYYY HH:MM`; anything else must be
/// `DD/MM/YYYY` and means the start of that day. Surrounding whitespace is
/// rejected.
pub fn parse_date_string(value: &str) -> Result<NaiveDateTime, ScreenError> {
    let padded = value.trim() != value;
    if value.contains(':') {
        NaiveDateTime::parse_from_str(value, DATE_TIME_BOUND)
            .ok()
            .filter(|_| !padded)
            .ok_or_else(|| ScreenError::DateFormat {
                value: value.to_string(),
                expected: "DD/MM/YYYY HH:MM",
            })
    } else {
        NaiveDate::parse_from_str(value, DATE_BOUND)
            .ok()
            .filter(|_| !padded)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| ScreenError::DateFormat {
                value: value.to_string(),
                expected: "DD/MM/YYYY",
            })
    }
}

/// Keep records created within `[start, end]` and order them newest-first.
///
/// Filtering only happens when both bounds are given; the descending sort
/// on `created_at` always happens. Comparison is at minute precision.
/// Records without `created_at` fall outside any active range and sort last.
pub fn filter_by_range(
    records: Vec<PersonRecord>,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<Vec<PersonRecord>, ScreenError> {
    let mut records = match (start, end) {
        (Some(start), Some(end)) => {
            let start = parse_date_string(start)?;
            let end = parse_date_string(end)?;
            let before = records.len();
            let kept: Vec<PersonRecord> = records
                .into_iter()
                .filter(|r| {
                    r.created_at
                        .map(truncate_to_minute)
                        .is_some_and(|ts| ts >= start && ts <= end)
                })
                .collect();
            log::debug!(
                "date range {start}..={end}: kept {} of {before} record(s)",
                kept.len()
            );
            kept
        }
        _ => records,
    };

    sort_newest_first(&mut records);
    Ok(records)
}

/// Stable sort by `created_at`, most recent first.
pub fn sort_newest_first(records: &mut [PersonRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

fn truncate_to_minute(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}
