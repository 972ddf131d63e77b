use chrono::NaiveDateTime;
use thiserror::Error;

const SORTABLE_FMT: &str = "%Y%m%d%H%M%S";
const WIRE_FMT: &str = "%d.%m.%Y %H:%M:%S";
pub const EMPTY_SORTABLE: &str = "00000000000000";

#[derive(Debug, Error, Eq, PartialEq)]
pub enum TimeError {
    #[error("date_time string did not match `{}`: {0:?}", WIRE_FMT)]
    Malformed(String),
    #[error("dateTimeSortable sentinel (empty/malformed source) has no instant")]
    Sentinel,
    #[error("dateTimeSortable was not exactly 14 digits: {0:?}")]
    WrongLength(String),
}

/// `DD.MM.YYYY HH:MM:SS` -> `YYYYMMDDHHMMSS`.
///
/// Empty or malformed input yields the sentinel `"00000000000000"` so the
/// record still sorts, to the bottom of a DESC-by-time scan.
pub fn format_date_time_sortable(date_time: &str) -> String {
    if date_time.is_empty() {
        return EMPTY_SORTABLE.to_string();
    }
    match NaiveDateTime::parse_from_str(date_time, WIRE_FMT) {
        Ok(dt) => dt.format(SORTABLE_FMT).to_string(),
        Err(_) => EMPTY_SORTABLE.to_string(),
    }
}

/// Inverse of [`format_date_time_sortable`] for genuine (non-sentinel)
/// values. Returns [`TimeError::Sentinel`] for the empty-input convention,
/// matching the boundary behavior in spec.md §8.
pub fn parse_date_time_sortable(sortable: &str) -> Result<NaiveDateTime, TimeError> {
    if sortable.len() != 14 {
        return Err(TimeError::WrongLength(sortable.to_string()));
    }
    if sortable == EMPTY_SORTABLE {
        return Err(TimeError::Sentinel);
    }
    NaiveDateTime::parse_from_str(sortable, SORTABLE_FMT)
        .map_err(|_| TimeError::Malformed(sortable.to_string()))
}

/// Seconds since the Unix epoch, or `0` for the empty/malformed convention.
pub fn unix_time(date_time: &str) -> i64 {
    if date_time.is_empty() {
        return 0;
    }
    NaiveDateTime::parse_from_str(date_time, WIRE_FMT)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or(0)
}

/// Rounds down to the start of the enclosing 5-minute bucket. Ties (an
/// instant exactly on a 5-minute boundary) round down, i.e. stay put: this
/// is the open question from spec.md §9 resolved explicitly, matching the
/// teacher's own integer-division rounding behavior.
pub fn round_to_five_minutes(dt: NaiveDateTime) -> NaiveDateTime {
    use chrono::Timelike;
    let minute = dt.minute();
    let rounded_minute = (minute / 5) * 5;
    dt.with_minute(rounded_minute)
        .unwrap()
        .with_second(0)
        .unwrap()
        .with_nanosecond(0)
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_sentinel_and_zero_unix_time() {
        assert_eq!(format_date_time_sortable(""), EMPTY_SORTABLE);
        assert_eq!(unix_time(""), 0);
    }

    #[test]
    fn round_trip_for_valid_datetime() {
        let wire = "03.01.2026 23:28:22";
        let sortable = format_date_time_sortable(wire);
        assert_eq!(sortable.len(), 14);
        let parsed = parse_date_time_sortable(&sortable).unwrap();
        assert_eq!(parsed.format(WIRE_FMT).to_string(), wire);
    }

    #[test]
    fn cross_year_sort_order() {
        let a = format_date_time_sortable("31.12.2025 23:59:00");
        let b = format_date_time_sortable("01.01.2026 00:01:00");
        assert!(b > a, "2026 instant must sort after 2025 instant lexicographically");
    }

    #[test]
    fn rounds_down_on_exact_boundary() {
        use chrono::Timelike;
        let dt = NaiveDateTime::parse_from_str("01.01.2026 00:05:00", WIRE_FMT).unwrap();
        let rounded = round_to_five_minutes(dt);
        assert_eq!(rounded.minute(), 5);
        let dt2 = NaiveDateTime::parse_from_str("01.01.2026 00:07:59", WIRE_FMT).unwrap();
        assert_eq!(round_to_five_minutes(dt2).minute(), 5);
    }

    #[test]
    fn sentinel_does_not_parse_back_to_an_instant() {
        assert_eq!(parse_date_time_sortable(EMPTY_SORTABLE), Err(TimeError::Sentinel));
    }
}
