//! Lenient duration-string tokenizer.
//!
//! A duration string is a sequence of `[sign]digits[.digits]<suffix>` tokens,
//! e.g. `"1y 2mo 3w 4d 5h 6m 7s 250ms"` or the compact `"1y2mo3w4d"`. Suffixes
//! are matched case-insensitively, preferring `ms`/`mo` over `m`/`s`.
//! Anything that does not form a token is skipped, so parsing never fails:
//! an empty or garbage string is simply a zero duration.
//!
//! An explicit sign carries over to the unsigned tokens that follow it, until
//! another sign appears: `"-1h30m"` is minus ninety minutes, while
//! `"-1h +30m"` is minus thirty.

use std::fmt;

use tracing::trace;

use crate::unit::Unit;

/// Accumulated signed amount per unit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DurationParts {
    values: [f64; 8],
}

impl DurationParts {
    /// The accumulated amount for `unit`.
    pub fn get(&self, unit: Unit) -> f64 {
        self.values[unit.index()]
    }

    /// Add `value` to the amount already held for `unit`.
    pub fn add(&mut self, unit: Unit, value: f64) {
        self.values[unit.index()] += value;
    }

    /// `(unit, amount)` pairs, largest unit first, including zeros.
    pub fn iter(&self) -> impl Iterator<Item = (Unit, f64)> + '_ {
        Unit::ALL.into_iter().map(|unit| (unit, self.get(unit)))
    }

    /// True when every unit's amount is zero.
    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }
}

/// Renders the parts back into the duration grammar, largest unit first.
///
/// Positive amounts that follow a negative one get an explicit `+` so the
/// output parses back to the same parts.
impl fmt::Display for DurationParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0ms");
        }
        let mut negative_seen = false;
        let mut first = true;
        for (unit, value) in self.iter().filter(|(_, v)| *v != 0.0) {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            if value > 0.0 && negative_seen {
                f.write_str("+")?;
            }
            negative_seen |= value < 0.0;
            write!(f, "{value}{unit}")?;
        }
        Ok(())
    }
}

/// Parse a duration string into per-unit totals.
///
/// # Examples
///
/// ```
/// use duration_timestamp::{parse_duration, Unit};
///
/// let parts = parse_duration("1y2mo 3.5h 250MS");
/// assert_eq!(parts.get(Unit::Year), 1.0);
/// assert_eq!(parts.get(Unit::Month), 2.0);
/// assert_eq!(parts.get(Unit::Hour), 3.5);
/// assert_eq!(parts.get(Unit::Millisecond), 250.0);
/// ```
pub fn parse_duration(input: &str) -> DurationParts {
    let mut parts = DurationParts::default();
    let mut sign = 1.0;
    let mut pos = 0;

    while pos < input.len() {
        match scan_token(input, pos) {
            Some(token) => {
                if let Some(explicit) = token.sign {
                    sign = explicit;
                }
                parts.add(token.unit, sign * token.magnitude);
                pos = token.end;
            }
            None => pos += 1,
        }
    }

    trace!(input, %parts, "parsed duration");
    parts
}

struct Token {
    sign: Option<f64>,
    magnitude: f64,
    unit: Unit,
    end: usize,
}

/// Try to read one token starting exactly at byte `start`.
fn scan_token(input: &str, start: usize) -> Option<Token> {
    let bytes = input.as_bytes();
    let mut pos = start;

    let sign = match bytes.get(pos)? {
        b'-' => Some(-1.0),
        b'+' => Some(1.0),
        _ => None,
    };
    if sign.is_some() {
        pos += 1;
    }

    let digits_start = pos;
    pos = skip_digits(bytes, pos);
    if pos == digits_start {
        return None;
    }
    if bytes.get(pos) == Some(&b'.') && bytes.get(pos + 1).is_some_and(u8::is_ascii_digit) {
        pos = skip_digits(bytes, pos + 1);
    }

    // Only ASCII digits and '.' sit in this range, so the slice is on char boundaries.
    let magnitude: f64 = input[digits_start..pos].parse().ok()?;
    let (unit, suffix_len) = match_suffix(&bytes[pos..])?;

    Some(Token {
        sign,
        magnitude,
        unit,
        end: pos + suffix_len,
    })
}

fn skip_digits(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
        pos += 1;
    }
    pos
}

/// Longest-match unit suffix at the start of `rest`.
fn match_suffix(rest: &[u8]) -> Option<(Unit, usize)> {
    [2, 1].into_iter().find_map(|len| {
        let head = std::str::from_utf8(rest.get(..len)?).ok()?;
        Unit::from_suffix(head).map(|unit| (unit, len))
    })
}
