//! CLI argument validators.
//!
//! Shared validation functions for CLI argument parsing.

use crate::constants::MAX_DURATION_SECS;
use std::time::Duration;

/// Parse and validate a bounded integer value.
///
/// # Arguments
///
/// * `s` - The string to parse
/// * `min` - Minimum allowed value (inclusive)
/// * `max` - Maximum allowed value (inclusive)
/// * `name` - Name of the parameter for error messages
pub fn parse_bounded_u32(s: &str, min: u32, max: u32, name: &str) -> Result<u32, String> {
    let value: u32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid whole number"))?;

    if !(min..=max).contains(&value) {
        return Err(format!(
            "{name} must be between {min} and {max}, got {value}"
        ));
    }

    Ok(value)
}

/// Parse and validate an event window length in seconds.
pub fn parse_duration_secs(s: &str) -> Result<u32, String> {
    parse_bounded_u32(s, 1, MAX_DURATION_SECS, "duration")
}

/// Parse and validate a worker count (0 = automatic).
pub fn parse_workers(s: &str) -> Result<usize, String> {
    let value = parse_bounded_u32(s, 0, 1024, "workers")?;
    Ok(value as usize)
}

/// Parse a lock timeout such as `90`, `90s`, `30m`, `2h` or `1d`.
pub fn parse_lock_timeout(s: &str) -> Result<Duration, String> {
    let invalid = || format!("'{s}' is not a valid timeout (e.g. 90s, 30m, 2h, 1d)");

    let trimmed = s.trim();
    let (digits, unit) = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .map_or((trimmed, "s"), |idx| trimmed.split_at(idx));
    let value: u64 = digits.parse().map_err(|_| invalid())?;
    let scale = match unit {
        "s" => 1,
        "m" => 60,
        "h" => 3600,
        "d" => 86_400,
        _ => return Err(invalid()),
    };

    value
        .checked_mul(scale)
        .map(Duration::from_secs)
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bounded_u32_valid() {
        assert_eq!(parse_bounded_u32("5", 1, 10, "test").ok(), Some(5));
        assert_eq!(parse_bounded_u32("1", 1, 10, "test").ok(), Some(1));
        assert_eq!(parse_bounded_u32("10", 1, 10, "test").ok(), Some(10));
    }

    #[test]
    fn test_parse_bounded_u32_invalid_range() {
        let err = parse_bounded_u32("11", 1, 10, "test").unwrap_err();
        assert!(err.contains("test must be between"));
    }

    #[test]
    fn test_parse_bounded_u32_invalid_number() {
        let err = parse_bounded_u32("-3", 1, 10, "test").unwrap_err();
        assert!(err.contains("not a valid whole number"));
        assert!(parse_bounded_u32("1.5", 1, 10, "test").is_err());
    }

    #[test]
    fn test_parse_duration_secs() {
        assert_eq!(parse_duration_secs("6000").ok(), Some(6000));
        assert!(parse_duration_secs("0").is_err());
        assert!(parse_duration_secs("86401").is_err());
    }

    #[test]
    fn test_parse_lock_timeout() {
        assert_eq!(parse_lock_timeout("90").ok(), Some(Duration::from_secs(90)));
        assert_eq!(parse_lock_timeout("30m").ok(), Some(Duration::from_secs(1800)));
        assert_eq!(parse_lock_timeout("2h").ok(), Some(Duration::from_secs(7200)));
        assert_eq!(parse_lock_timeout("1d").ok(), Some(Duration::from_secs(86_400)));
        assert!(parse_lock_timeout("h").is_err());
        assert!(parse_lock_timeout("5w").is_err());
        assert!(parse_lock_timeout("").is_err());
    }

    #[test]
    fn test_parse_workers() {
        assert_eq!(parse_workers("0").ok(), Some(0));
        assert_eq!(parse_workers("8").ok(), Some(8));
        assert!(parse_workers("many").is_err());
    }
}
