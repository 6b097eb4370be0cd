//! Date and time helpers for catalog parsing and folder naming.

use crate::constants::{DAY_FOLDER_FORMAT, EVENT_FOLDER_FORMAT};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

/// Naive formats accepted for catalog times, all interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y%m%d%H%M%S"];

/// Parse a catalog time string as UTC.
///
/// Accepts RFC 3339 (`2016-05-01T00:00:04Z`, `...+08:00`), naive ISO 8601 with an
/// optional `Z` (`2016-05-01T00:00:04.5`), a bare date (`2016-05-01`, midnight), and
/// the compact archive form `20160501000004`.
pub fn parse_utc(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = s.strip_suffix('Z').unwrap_or(s);
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }

    NaiveDate::parse_from_str(naive, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt))
}

/// Build a fixed offset from whole hours east of UTC.
pub fn civil_offset(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours * 3600).unwrap_or_else(|| Utc.fix())
}

/// Day folder key (`YYYYMMDD`) of an instant in the civil time zone.
pub fn day_folder_key(instant: &DateTime<FixedOffset>) -> String {
    instant.format(DAY_FOLDER_FORMAT).to_string()
}

/// Event output sub-folder name (`YYYYMMDDHHMMSS`) of a UTC instant.
pub fn event_folder_name(instant: &DateTime<Utc>) -> String {
    instant.format(EVENT_FOLDER_FORMAT).to_string()
}

/// Nanoseconds from `from` to `to`, saturating on overflow.
pub fn nanos_between(from: &DateTime<Utc>, to: &DateTime<Utc>) -> i64 {
    (*to - *from).num_nanoseconds().unwrap_or(if to > from {
        i64::MAX
    } else {
        i64::MIN
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_utc("2016-05-01T00:00:04Z").unwrap();
        assert_eq!(dt.to_rfc3339(), "2016-05-01T00:00:04+00:00");

        let shifted = parse_utc("2016-05-01T08:00:04+08:00").unwrap();
        assert_eq!(shifted, dt);
    }

    #[test]
    fn test_parse_naive_with_fraction() {
        let dt = parse_utc("2016-05-01T00:00:04.250").unwrap();
        assert_eq!(dt.second(), 4);
        assert_eq!(dt.nanosecond(), 250_000_000);

        let zulu = parse_utc("2016-05-01T00:00:04.250Z").unwrap();
        assert_eq!(zulu, dt);
    }

    #[test]
    fn test_parse_compact_and_date_only() {
        let compact = parse_utc("20160501000004").unwrap();
        assert_eq!(compact, parse_utc("2016-05-01T00:00:04").unwrap());

        let date = parse_utc("2016-05-01").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2016, 5, 1));
        assert_eq!(date.hour(), 0);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_utc("yesterday").is_none());
        assert!(parse_utc("2016-13-01T00:00:00").is_none());
    }

    #[test]
    fn test_day_folder_key_uses_civil_offset() {
        let utc = parse_utc("2016-04-30T16:30:00Z").unwrap();
        assert_eq!(day_folder_key(&utc.with_timezone(&civil_offset(0))), "20160430");
        assert_eq!(day_folder_key(&utc.with_timezone(&civil_offset(8))), "20160501");
    }

    #[test]
    fn test_event_folder_name() {
        let utc = parse_utc("2016-05-01T00:00:04.9Z").unwrap();
        assert_eq!(event_folder_name(&utc), "20160501000004");
    }

    #[test]
    fn test_nanos_between() {
        let a = parse_utc("2016-05-01T00:00:00Z").unwrap();
        let b = parse_utc("2016-05-01T00:00:01.5Z").unwrap();
        assert_eq!(nanos_between(&a, &b), 1_500_000_000);
        assert_eq!(nanos_between(&b, &a), -1_500_000_000);
    }
}
