//! Pure timestamp transforms.
//!
//! Every function here takes a UTC millisecond timestamp and returns a new
//! one. Years and months move the calendar month index and keep the
//! time-of-day; every other unit is a fixed number of milliseconds (UTC has
//! no DST, and leap seconds are not modelled).

use chrono::{DateTime, Datelike, Days, Months, Utc};
use serde::Serialize;

use crate::error::{DurationError, Result};
use crate::unit::{Unit, UnitSpan};

// ── Configurable month rollover ─────────────────────────────────────────────

/// What to do when a month shift lands on a day the target month lacks
/// (e.g. January 31 + 1 month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RolloverPolicy {
    /// Spill the excess days into the following month:
    /// Jan 31 + 1mo = Mar 2 (leap year) or Mar 3, Feb 29 + 1y = Mar 1.
    #[default]
    Overflow,
    /// Stop at the last day of the target month:
    /// Jan 31 + 1mo = Feb 29 or Feb 28, Feb 29 + 1y = Feb 28.
    Clamp,
}

/// Options shared by the forward and reverse conversions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    /// How day-of-month overflow is resolved for year and month units.
    pub rollover: RolloverPolicy,
}

// ── Timestamp transforms ────────────────────────────────────────────────────

/// Add a whole number of `unit`s to `timestamp`.
///
/// # Errors
///
/// Returns [`DurationError::OutOfRange`] if the result cannot be represented,
/// or [`DurationError::InvalidTimestamp`] if `timestamp` itself is outside the
/// supported range.
///
/// # Examples
///
/// ```
/// use duration_timestamp::{add_units, RolloverPolicy, Unit};
///
/// // 2024-01-31T00:00:00Z + 1 month, clamped to the end of February
/// let jan_31 = 1_706_659_200_000;
/// let feb_29 = add_units(jan_31, Unit::Month, 1, RolloverPolicy::Clamp).unwrap();
/// assert_eq!(feb_29, 1_709_164_800_000);
/// ```
pub fn add_units(
    timestamp: i64,
    unit: Unit,
    amount: i64,
    rollover: RolloverPolicy,
) -> Result<i64> {
    match unit.span() {
        UnitSpan::Months(per_step) => {
            let months = amount
                .checked_mul(per_step)
                .ok_or_else(|| out_of_range(format!("{amount}{unit} overflows")))?;
            add_months(timestamp, months, rollover)
        }
        UnitSpan::Millis(len) => {
            let delta = amount
                .checked_mul(len)
                .ok_or_else(|| out_of_range(format!("{amount}{unit} overflows")))?;
            offset(timestamp, delta)
        }
    }
}

/// Add a possibly fractional number of `unit`s to `timestamp`.
///
/// Fixed-length units add `amount × length`, rounded to the nearest
/// millisecond. For years and months the whole part is a calendar shift and
/// the fractional part is that share of the next calendar step from the
/// intermediate instant, so 1.5y from 2023-01-01 is 2024-01-01 plus half of
/// 2024's 366 days.
///
/// # Errors
///
/// Returns [`DurationError::OutOfRange`] for non-finite amounts or results
/// that cannot be represented.
pub fn add_amount(
    timestamp: i64,
    unit: Unit,
    amount: f64,
    rollover: RolloverPolicy,
) -> Result<i64> {
    if !amount.is_finite() {
        return Err(out_of_range(format!("{amount}{unit} is not a finite amount")));
    }

    match unit.span() {
        UnitSpan::Millis(len) => offset(timestamp, round_millis(amount * len as f64)?),
        UnitSpan::Months(_) => {
            let whole = amount.trunc();
            let fraction = amount - whole;
            let start = add_units(timestamp, unit, whole_amount(whole)?, rollover)?;
            if fraction == 0.0 {
                return Ok(start);
            }
            let step = if fraction > 0.0 { 1 } else { -1 };
            let next = add_units(start, unit, step, rollover)?;
            let partial = round_millis((next - start) as f64 * fraction.abs())?;
            offset(start, partial)
        }
    }
}

/// Convert a millisecond timestamp into a chrono UTC datetime.
pub(crate) fn to_datetime(timestamp: i64) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(timestamp).ok_or_else(|| {
        DurationError::InvalidTimestamp(format!("{timestamp} ms is outside the supported range"))
    })
}

// ── Internal helpers ────────────────────────────────────────────────────────

fn add_months(timestamp: i64, months: i64, rollover: RolloverPolicy) -> Result<i64> {
    if months == 0 {
        return Ok(timestamp);
    }

    let dt = to_datetime(timestamp)?;
    let date = dt.date_naive();
    let leaves_calendar =
        || out_of_range(format!("{months} months from {dt} leaves the calendar"));

    let steps = u32::try_from(months.unsigned_abs()).map_err(|_| leaves_calendar())?;
    // chrono lands on the last day of the target month when `date.day()` is missing there
    let clamped = if months > 0 {
        date.checked_add_months(Months::new(steps))
    } else {
        date.checked_sub_months(Months::new(steps))
    }
    .ok_or_else(leaves_calendar)?;

    let shifted = match rollover {
        RolloverPolicy::Clamp => Some(clamped),
        RolloverPolicy::Overflow => {
            clamped.checked_add_days(Days::new(u64::from(date.day() - clamped.day())))
        }
    }
    .ok_or_else(leaves_calendar)?;

    Ok(shifted.and_time(dt.time()).and_utc().timestamp_millis())
}

/// Add `delta` milliseconds, failing if the result leaves chrono's range.
fn offset(timestamp: i64, delta: i64) -> Result<i64> {
    timestamp
        .checked_add(delta)
        .filter(|ms| DateTime::<Utc>::from_timestamp_millis(*ms).is_some())
        .ok_or_else(|| out_of_range(format!("{timestamp} ms + {delta} ms")))
}

/// Round to the nearest whole millisecond, rejecting values beyond `i64`.
fn round_millis(value: f64) -> Result<i64> {
    let rounded = value.round();
    if rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
        Ok(rounded as i64)
    } else {
        Err(out_of_range(format!("{value} ms does not fit in a timestamp")))
    }
}

fn whole_amount(value: f64) -> Result<i64> {
    if value >= i64::MIN as f64 && value < i64::MAX as f64 {
        Ok(value as i64)
    } else {
        Err(out_of_range(format!("{value} units does not fit in an integer count")))
    }
}

fn out_of_range(msg: String) -> DurationError {
    DurationError::OutOfRange(msg)
}

// ── Tests ───────────────────────────────────────────────────────────────────
