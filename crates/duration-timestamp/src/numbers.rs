//! Calendar-naive reduction of a duration string to plain numbers.
//!
//! Uses fixed factors (year = 365 days, month = 30 days, week = 7 days), so
//! `"1y"` is always 31 536 000 seconds even though the forward converter may
//! add 366 days for the same string. That difference is intended: these
//! totals are for rate limits, TTLs and the like, where a calendar is not
//! involved.

use serde::Serialize;
use tracing::trace;

use crate::parser::{parse_duration, DurationParts};

/// Total length of a duration string.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationNumbers {
    pub total_seconds: f64,
    pub total_milliseconds: f64,
}

/// Reduce a duration string to seconds and milliseconds.
///
/// # Examples
///
/// ```
/// use duration_timestamp::convert_duration_to_numbers;
///
/// let totals = convert_duration_to_numbers("1w");
/// assert_eq!(totals.total_seconds, 604_800.0);
/// assert_eq!(totals.total_milliseconds, 604_800_000.0);
/// ```
pub fn convert_duration_to_numbers(duration: &str) -> DurationNumbers {
    reduce_parts(&parse_duration(duration))
}

/// Linear sum of `amount × approximate unit length` over all units.
pub fn reduce_parts(parts: &DurationParts) -> DurationNumbers {
    let total_milliseconds: f64 = parts
        .iter()
        .map(|(unit, amount)| amount * unit.approx_millis())
        .sum();
    let numbers = DurationNumbers {
        total_seconds: total_milliseconds / 1000.0,
        total_milliseconds,
    };
    trace!(%parts, ?numbers, "reduced duration");
    numbers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days() {
        assert_eq!(convert_duration_to_numbers("2d").total_seconds, 2.0 * 86_400.0);
    }

    #[test]
    fn test_year_is_365_days() {
        assert_eq!(convert_duration_to_numbers("1y").total_seconds, 365.0 * 86_400.0);
    }

    #[test]
    fn test_month_is_30_days() {
        assert_eq!(convert_duration_to_numbers("1mo").total_seconds, 30.0 * 86_400.0);
    }

    #[test]
    fn test_week() {
        let totals = convert_duration_to_numbers("1w");
        assert_eq!(totals.total_seconds, 604_800.0);
        assert_eq!(totals.total_milliseconds, 604_800_000.0);
    }

    #[test]
    fn test_negative_sign_carries() {
        assert_eq!(convert_duration_to_numbers("-1h30m").total_milliseconds, -5_400_000.0);
        assert_eq!(convert_duration_to_numbers("-1h +30m").total_milliseconds, -1_800_000.0);
    }

    #[test]
    fn test_milliseconds_and_fractions() {
        let totals = convert_duration_to_numbers("1.5s 250ms");
        assert_eq!(totals.total_milliseconds, 1_750.0);
        assert_eq!(totals.total_seconds, 1.75);
    }

    #[test]
    fn test_full_expression() {
        let totals = convert_duration_to_numbers("1y 2mo 3w 4d 5h 6m 7s 250ms");
        let expected_seconds = 365.0 * 86_400.0
            + 2.0 * 30.0 * 86_400.0
            + 25.0 * 86_400.0
            + 5.0 * 3_600.0
            + 6.0 * 60.0
            + 7.25;
        assert_eq!(totals.total_seconds, expected_seconds);
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(convert_duration_to_numbers(""), DurationNumbers::default());
        assert_eq!(convert_duration_to_numbers("soon"), DurationNumbers::default());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(convert_duration_to_numbers("1s")).unwrap();
        assert_eq!(json["totalSeconds"], 1.0);
        assert_eq!(json["totalMilliseconds"], 1000.0);
    }
}
