//! # duration-timestamp
//!
//! Calendar-aware conversion between human-readable duration strings and UTC
//! timestamps.
//!
//! Duration strings look like `"1y 2mo 3w 4d 5h 6m 7s 250ms"` (or compact,
//! `"1y2mo3w4d5h6m7s250ms"`), with optional signs and fractions per token.
//! Applying one to a date uses real calendar arithmetic, so a month is not a
//! fixed number of days; describing the gap between two instants produces the
//! canonical string that applies back to exactly the same instant.
//!
//! ## Modules
//!
//! - [`parser`] — duration string → per-unit amounts
//! - [`calendar`] — pure `add_units` timestamp transforms and rollover policy
//! - [`convert`] — duration → timestamp and timestamp → duration
//! - [`numbers`] — fixed-factor reduction to total seconds/milliseconds
//! - [`clock`] — injectable source of "now"
//! - [`unit`] — the eight units and their order
//! - [`error`] — Error types

pub mod calendar;
pub mod clock;
pub mod convert;
pub mod error;
pub mod numbers;
pub mod parser;
pub mod unit;

pub use calendar::{add_amount, add_units, ConvertOptions, RolloverPolicy};
pub use clock::{Clock, FixedClock, SystemClock};
pub use convert::{
    apply_parts, convert_duration_to_utc_timestamp, convert_utc_timestamp_to_duration_string,
    decompose_difference, DurationBreakdown, DurationConverter, DurationResult,
};
pub use error::DurationError;
pub use numbers::{convert_duration_to_numbers, reduce_parts, DurationNumbers};
pub use parser::{parse_duration, DurationParts};
pub use unit::Unit;
