//! The eight duration units and their fixed largest-to-smallest order.

use std::fmt;

use serde::Serialize;

pub(crate) const MILLIS_PER_SECOND: i64 = 1_000;
pub(crate) const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
pub(crate) const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
pub(crate) const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;
pub(crate) const MILLIS_PER_WEEK: i64 = 7 * MILLIS_PER_DAY;

/// A duration granularity.
///
/// Variants are declared largest first, so sorting by the derived `Ord`
/// yields the order in which units are applied and extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
}

/// How one step of a unit moves a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnitSpan {
    /// Shifts the calendar month index by this many months.
    Months(i64),
    /// Adds exactly this many milliseconds.
    Millis(i64),
}

impl Unit {
    /// All units, largest to smallest.
    pub const ALL: [Unit; 8] = [
        Unit::Year,
        Unit::Month,
        Unit::Week,
        Unit::Day,
        Unit::Hour,
        Unit::Minute,
        Unit::Second,
        Unit::Millisecond,
    ];

    /// Position of this unit in [`Unit::ALL`].
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// The suffix used in duration strings (`"y"`, `"mo"`, ..., `"ms"`).
    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Year => "y",
            Unit::Month => "mo",
            Unit::Week => "w",
            Unit::Day => "d",
            Unit::Hour => "h",
            Unit::Minute => "m",
            Unit::Second => "s",
            Unit::Millisecond => "ms",
        }
    }

    /// Look up a unit by suffix, ignoring ASCII case.
    pub fn from_suffix(s: &str) -> Option<Unit> {
        Unit::ALL
            .into_iter()
            .find(|unit| unit.suffix().eq_ignore_ascii_case(s))
    }

    /// Approximate length in milliseconds (year = 365 days, month = 30 days).
    ///
    /// Only the numeric reducer uses these factors; calendar arithmetic never
    /// does.
    pub fn approx_millis(self) -> f64 {
        match self {
            Unit::Year => 365.0 * MILLIS_PER_DAY as f64,
            Unit::Month => 30.0 * MILLIS_PER_DAY as f64,
            Unit::Week => MILLIS_PER_WEEK as f64,
            Unit::Day => MILLIS_PER_DAY as f64,
            Unit::Hour => MILLIS_PER_HOUR as f64,
            Unit::Minute => MILLIS_PER_MINUTE as f64,
            Unit::Second => MILLIS_PER_SECOND as f64,
            Unit::Millisecond => 1.0,
        }
    }

    pub(crate) fn span(self) -> UnitSpan {
        match self {
            Unit::Year => UnitSpan::Months(12),
            Unit::Month => UnitSpan::Months(1),
            Unit::Week => UnitSpan::Millis(MILLIS_PER_WEEK),
            Unit::Day => UnitSpan::Millis(MILLIS_PER_DAY),
            Unit::Hour => UnitSpan::Millis(MILLIS_PER_HOUR),
            Unit::Minute => UnitSpan::Millis(MILLIS_PER_MINUTE),
            Unit::Second => UnitSpan::Millis(MILLIS_PER_SECOND),
            Unit::Millisecond => UnitSpan::Millis(1),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}
