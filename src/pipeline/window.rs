//! Event time window and day-folder resolution.

use crate::utils::date::{civil_offset, day_folder_key};
use chrono::{DateTime, TimeDelta, Utc};

/// Extraction window of one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    /// Window start (the event origin time).
    pub utc_start: DateTime<Utc>,
    /// Window end, `utc_start + duration`.
    pub utc_end: DateTime<Utc>,
    /// One or two civil-day folder keys (`YYYYMMDD`), in chronological order.
    pub day_folder_keys: Vec<String>,
}

impl TimeWindow {
    /// Resolve the window for an event starting at `utc_start`.
    ///
    /// Day folders are picked from the window bounds shifted into the civil time zone
    /// `UTC+offset_hours`. Durations are bounded by config validation so at most one
    /// civil-day boundary is crossed.
    pub fn resolve(utc_start: DateTime<Utc>, duration_secs: u32, offset_hours: i32) -> Self {
        let utc_end = utc_start + TimeDelta::seconds(i64::from(duration_secs));
        let offset = civil_offset(offset_hours);

        let start_key = day_folder_key(&utc_start.with_timezone(&offset));
        let end_key = day_folder_key(&utc_end.with_timezone(&offset));

        let day_folder_keys = if start_key == end_key {
            vec![start_key]
        } else {
            vec![start_key, end_key]
        };

        Self {
            utc_start,
            utc_end,
            day_folder_keys,
        }
    }

    /// Whether the window spans two civil days.
    pub fn is_cross_day(&self) -> bool {
        self.day_folder_keys.len() > 1
    }

    /// Day folder holding the window start.
    pub fn start_key(&self) -> &str {
        &self.day_folder_keys[0]
    }

    /// Day folder holding the window end.
    pub fn end_key(&self) -> &str {
        &self.day_folder_keys[self.day_folder_keys.len() - 1]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_same_civil_day_gives_one_key() {
        let start = Utc.with_ymd_and_hms(2016, 5, 1, 0, 0, 4).unwrap();
        let window = TimeWindow::resolve(start, 6000, 8);

        assert_eq!(window.utc_start, start);
        assert_eq!(window.utc_end, start + TimeDelta::seconds(6000));
        assert_eq!(window.day_folder_keys, vec!["20160501"]);
        assert!(!window.is_cross_day());
        assert_eq!(window.start_key(), window.end_key());
    }

    #[test]
    fn test_crossing_civil_midnight_gives_two_keys() {
        // 15:00Z is 23:00 civil; 6000 s later is 00:40 on the next civil day.
        let start = Utc.with_ymd_and_hms(2016, 5, 1, 15, 0, 0).unwrap();
        let window = TimeWindow::resolve(start, 6000, 8);

        assert_eq!(window.day_folder_keys, vec!["20160501", "20160502"]);
        assert!(window.is_cross_day());
        assert_eq!(window.start_key(), "20160501");
        assert_eq!(window.end_key(), "20160502");
    }

    #[test]
    fn test_civil_shift_moves_start_day() {
        // 16:30Z on 30 April is already 1 May at UTC+8.
        let start = Utc.with_ymd_and_hms(2016, 4, 30, 16, 30, 0).unwrap();
        assert_eq!(
            TimeWindow::resolve(start, 600, 8).day_folder_keys,
            vec!["20160501"]
        );
        assert_eq!(
            TimeWindow::resolve(start, 600, 0).day_folder_keys,
            vec!["20160430"]
        );
    }

    #[test]
    fn test_window_ending_exactly_at_midnight_is_cross_day() {
        let start = Utc.with_ymd_and_hms(2016, 5, 1, 15, 0, 0).unwrap();
        let window = TimeWindow::resolve(start, 3600, 8);
        assert_eq!(window.day_folder_keys, vec!["20160501", "20160502"]);
    }
}
