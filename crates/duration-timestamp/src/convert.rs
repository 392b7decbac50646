//! Duration string ⇄ UTC timestamp conversion.
//!
//! The forward direction applies parsed amounts to a base instant, largest
//! unit first, with calendar arithmetic for years and months. The reverse
//! direction walks the same unit order and greedily takes the largest count
//! of each unit that does not pass the target, which makes
//! `apply(describe(t, b), b) == t` hold exactly for any `t >= b`.
//!
//! # Functions
//!
//! - [`convert_duration_to_utc_timestamp`] — duration string + base → timestamp
//! - [`convert_utc_timestamp_to_duration_string`] — timestamp + base → duration string
//! - [`apply_parts`] / [`decompose_difference`] — the clock-free cores of the two

use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use tracing::{debug, trace};

use crate::calendar::{add_amount, add_units, to_datetime, ConvertOptions, RolloverPolicy};
use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::numbers::{convert_duration_to_numbers, DurationNumbers};
use crate::parser::{parse_duration, DurationParts};
use crate::unit::{Unit, UnitSpan};

// ── Result types ────────────────────────────────────────────────────────────

/// The outcome of applying a duration to a base instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationResult {
    /// The resulting instant in UTC epoch milliseconds.
    pub utc_timestamp: i64,
    /// `utc_timestamp - base`. Not the naive sum of the parsed amounts:
    /// years and months vary in length.
    pub duration_ms: i64,
}

/// Per-unit counts describing the difference between two instants.
///
/// Counts are never negative; `negative` records that the target preceded
/// the base. `Display` renders the canonical duration string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DurationBreakdown {
    pub negative: bool,
    pub years: i64,
    pub months: i64,
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub milliseconds: i64,
}

impl DurationBreakdown {
    /// The count recorded for `unit`.
    pub fn count(&self, unit: Unit) -> i64 {
        match unit {
            Unit::Year => self.years,
            Unit::Month => self.months,
            Unit::Week => self.weeks,
            Unit::Day => self.days,
            Unit::Hour => self.hours,
            Unit::Minute => self.minutes,
            Unit::Second => self.seconds,
            Unit::Millisecond => self.milliseconds,
        }
    }

    fn set(&mut self, unit: Unit, count: i64) {
        let slot = match unit {
            Unit::Year => &mut self.years,
            Unit::Month => &mut self.months,
            Unit::Week => &mut self.weeks,
            Unit::Day => &mut self.days,
            Unit::Hour => &mut self.hours,
            Unit::Minute => &mut self.minutes,
            Unit::Second => &mut self.seconds,
            Unit::Millisecond => &mut self.milliseconds,
        };
        *slot = count;
    }

    /// True when the two instants were identical.
    pub fn is_zero(&self) -> bool {
        Unit::ALL.into_iter().all(|unit| self.count(unit) == 0)
    }
}

impl fmt::Display for DurationBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        if self.is_zero() {
            return f.write_str("0ms");
        }
        let mut first = true;
        for unit in Unit::ALL {
            let count = self.count(unit);
            if count == 0 {
                continue;
            }
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{count}{unit}")?;
        }
        Ok(())
    }
}

// ── Clock-free cores ────────────────────────────────────────────────────────

/// Apply parsed duration parts to `base` (UTC epoch milliseconds).
///
/// Units are applied largest first regardless of the order they appeared in
/// the input string. Zero amounts are skipped.
///
/// # Errors
///
/// Returns [`DurationError::InvalidTimestamp`](crate::DurationError::InvalidTimestamp)
/// if `base` is outside the supported range, or
/// [`DurationError::OutOfRange`](crate::DurationError::OutOfRange) if an
/// intermediate result is.
pub fn apply_parts(
    parts: &DurationParts,
    base: i64,
    options: &ConvertOptions,
) -> Result<DurationResult> {
    to_datetime(base)?;

    let mut cursor = base;
    for (unit, amount) in parts.iter().filter(|(_, amount)| *amount != 0.0) {
        cursor = add_amount(cursor, unit, amount, options.rollover)?;
        trace!(%unit, amount, cursor, "applied unit");
    }

    Ok(DurationResult {
        utc_timestamp: cursor,
        duration_ms: cursor - base,
    })
}

/// Break the difference between `target` and `base` into unit counts.
///
/// # Errors
///
/// Returns [`DurationError::InvalidTimestamp`](crate::DurationError::InvalidTimestamp)
/// if either instant is outside the supported range.
pub fn decompose_difference(
    target: i64,
    base: i64,
    options: &ConvertOptions,
) -> Result<DurationBreakdown> {
    to_datetime(target)?;
    to_datetime(base)?;

    let negative = target < base;
    let (start, end) = if negative { (target, base) } else { (base, target) };

    let mut breakdown = DurationBreakdown {
        negative,
        ..Default::default()
    };
    let mut cursor = start;
    for unit in Unit::ALL {
        let (count, reached) = count_units(cursor, end, unit, options.rollover)?;
        trace!(%unit, count, cursor = reached, "extracted unit");
        breakdown.set(unit, count);
        cursor = reached;
    }
    debug_assert_eq!(cursor, end, "milliseconds absorb the remainder");

    Ok(breakdown)
}

/// Largest `k >= 0` with `add_units(cursor, unit, k) <= target`, and that instant.
fn count_units(
    cursor: i64,
    target: i64,
    unit: Unit,
    rollover: RolloverPolicy,
) -> Result<(i64, i64)> {
    match unit.span() {
        UnitSpan::Millis(len) => {
            let count = (target - cursor) / len;
            Ok((count, cursor + count * len))
        }
        UnitSpan::Months(per_step) => {
            count_calendar_units(cursor, target, unit, per_step, rollover)
        }
    }
}

/// Estimate the count from the calendar fields, then correct it with the
/// `next <= target` rule. Adding k months is monotonic in k under both
/// rollover policies, so the corrections only ever walk a step or two.
fn count_calendar_units(
    cursor: i64,
    target: i64,
    unit: Unit,
    months_per_step: i64,
    rollover: RolloverPolicy,
) -> Result<(i64, i64)> {
    let from = to_datetime(cursor)?;
    let to = to_datetime(target)?;
    let month_gap = (i64::from(to.year()) - i64::from(from.year())) * 12
        + i64::from(to.month0())
        - i64::from(from.month0());

    let mut count = (month_gap / months_per_step).max(0);
    let mut reached = loop {
        if count == 0 {
            break cursor;
        }
        match add_units(cursor, unit, count, rollover) {
            Ok(instant) if instant <= target => break instant,
            _ => count -= 1,
        }
    };

    while let Ok(next) = add_units(cursor, unit, count + 1, rollover) {
        if next > target {
            break;
        }
        count += 1;
        reached = next;
    }

    Ok((count, reached))
}

// ── Converter with an injectable clock ──────────────────────────────────────

/// Runs conversions against a [`Clock`] and a set of [`ConvertOptions`].
///
/// The clock is read only when a call omits its base instant.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use duration_timestamp::{DurationConverter, FixedClock};
///
/// // "now" pinned to 2024-01-01T00:00:00Z
/// let converter = DurationConverter::with_clock(FixedClock(1_704_067_200_000));
/// let result = converter.convert_duration_to_utc_timestamp("1d", None).unwrap();
/// assert_eq!(result.duration_ms, 86_400_000);
///
/// let target = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
/// let s = converter
///     .convert_utc_timestamp_to_duration_string(target.timestamp_millis(), None)
///     .unwrap();
/// assert_eq!(s, "-1y");
/// ```
#[derive(Debug, Clone, Default)]
pub struct DurationConverter<C = SystemClock> {
    clock: C,
    options: ConvertOptions,
}

impl DurationConverter<SystemClock> {
    /// A converter reading the system clock, with default options.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock> DurationConverter<C> {
    /// A converter reading "now" from `clock`, with default options.
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            options: ConvertOptions::default(),
        }
    }

    /// Replace the conversion options.
    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    fn base_millis(&self, base: Option<DateTime<Utc>>) -> i64 {
        base.map_or_else(|| self.clock.now_millis(), |dt| dt.timestamp_millis())
    }

    /// Add `duration` to `base` (or to now).
    ///
    /// # Errors
    ///
    /// See [`apply_parts`].
    pub fn convert_duration_to_utc_timestamp(
        &self,
        duration: &str,
        base: Option<DateTime<Utc>>,
    ) -> Result<DurationResult> {
        let base = self.base_millis(base);
        let parts = parse_duration(duration);
        let result = apply_parts(&parts, base, &self.options)?;
        debug!(
            duration,
            base,
            utc_timestamp = result.utc_timestamp,
            duration_ms = result.duration_ms,
            "converted duration to timestamp"
        );
        Ok(result)
    }

    /// Structured difference between `utc_timestamp` and `base` (or now).
    ///
    /// # Errors
    ///
    /// See [`decompose_difference`].
    pub fn decompose(
        &self,
        utc_timestamp: i64,
        base: Option<DateTime<Utc>>,
    ) -> Result<DurationBreakdown> {
        let base = self.base_millis(base);
        decompose_difference(utc_timestamp, base, &self.options)
    }

    /// Canonical duration string from `base` (or now) to `utc_timestamp`.
    ///
    /// Zero units are omitted, an empty difference is `"0ms"`, and a target
    /// before the base gets a leading `-`.
    ///
    /// # Errors
    ///
    /// See [`decompose_difference`].
    pub fn convert_utc_timestamp_to_duration_string(
        &self,
        utc_timestamp: i64,
        base: Option<DateTime<Utc>>,
    ) -> Result<String> {
        let base = self.base_millis(base);
        let described = decompose_difference(utc_timestamp, base, &self.options)?.to_string();
        debug!(utc_timestamp, base, %described, "converted timestamp to duration");
        Ok(described)
    }

    /// Same as the free [`convert_duration_to_numbers`]; needs neither clock
    /// nor options.
    pub fn convert_duration_to_numbers(&self, duration: &str) -> DurationNumbers {
        convert_duration_to_numbers(duration)
    }
}

// ── Free functions (system clock, default options) ──────────────────────────

/// Add a duration string to `base`, or to the current instant when `None`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use duration_timestamp::convert_duration_to_utc_timestamp;
///
/// let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let result = convert_duration_to_utc_timestamp("3.5h", Some(base)).unwrap();
/// let expected = Utc.with_ymd_and_hms(2024, 1, 1, 3, 30, 0).unwrap();
/// assert_eq!(result.utc_timestamp, expected.timestamp_millis());
/// ```
///
/// # Errors
///
/// See [`apply_parts`].
pub fn convert_duration_to_utc_timestamp(
    duration: &str,
    base: Option<DateTime<Utc>>,
) -> Result<DurationResult> {
    DurationConverter::new().convert_duration_to_utc_timestamp(duration, base)
}

/// Describe `utc_timestamp` relative to `base`, or to the current instant.
///
/// # Errors
///
/// See [`decompose_difference`].
pub fn convert_utc_timestamp_to_duration_string(
    utc_timestamp: i64,
    base: Option<DateTime<Utc>>,
) -> Result<String> {
    DurationConverter::new().convert_utc_timestamp_to_duration_string(utc_timestamp, base)
}

// ── Tests ───────────────────────────────────────────────────────────────────
