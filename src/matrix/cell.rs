use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

use crate::util::format_number;

/// What an unset cell prints as. Existing encoded files carry this literal,
/// so the encoder and the interner both use it for holes.
pub const HOLE_PLACEHOLDER: &str = "undefined";

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single spreadsheet value.
///
/// Every variant has exactly one canonical text form, given by its
/// `Display` impl. Interning and encoding only ever look at that form, so a
/// `Number(5.0)` and a `Text("5")` are the same value to them.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cell {
    /// The empty string. Written by the normalizer as padding.
    #[default]
    Empty,
    /// An index that was never set.
    Hole,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Midnight values print as a bare date.
    Date(NaiveDateTime),
}

impl Cell {
    /// Build a cell from a raw text field.
    ///
    /// A field only becomes a `Bool`, `Number` or `Date` when that value
    /// prints back to exactly the same text, so `encode(load(file))` never
    /// rewrites a field (`"007"` and `"1.50"` stay `Text`).
    pub fn infer(raw: &str) -> Cell {
        if raw.is_empty() {
            return Cell::Empty;
        }
        match raw {
            "true" => return Cell::Bool(true),
            "false" => return Cell::Bool(false),
            _ => {}
        }
        if let Ok(n) = raw.parse::<f64>() {
            if n.is_finite() && format_number(n) == raw {
                return Cell::Number(n);
            }
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT) {
            if dt.format(DATETIME_FORMAT).to_string() == raw && dt.time() != NaiveTime::MIN {
                return Cell::Date(dt);
            }
        }
        if let Ok(d) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            if d.format(DATE_FORMAT).to_string() == raw {
                return Cell::Date(d.and_time(NaiveTime::MIN));
            }
        }
        Cell::Text(raw.to_string())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Hole => f.write_str(HOLE_PLACEHOLDER),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Number(n) => f.write_str(&format_number(*n)),
            Cell::Text(s) => f.write_str(s),
            Cell::Date(dt) if dt.time() == NaiveTime::MIN => {
                write!(f, "{}", dt.format(DATE_FORMAT))
            }
            Cell::Date(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
        }
    }
}

// Holes serialize as null; everything else as its natural JSON type.
impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Hole => serializer.serialize_none(),
            Cell::Empty => serializer.serialize_str(""),
            Cell::Bool(b) => serializer.serialize_bool(*b),
            Cell::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            other => serializer.collect_str(other),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<i32> for Cell {
    fn from(n: i32) -> Self {
        Cell::Number(f64::from(n))
    }
}

/// Largest integer magnitude an `f64` holds exactly (2^53 - 1).
pub const MAX_EXACT_INTEGER: i64 = (1 << 53) - 1;

/// An `i64` too large in magnitude to be a `Cell::Number` without rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{0} cannot be stored exactly in a number cell")]
pub struct LossyInteger(pub i64);

// Rounding would let two distinct integers share one canonical form, so
// only the exactly representable range converts.
impl TryFrom<i64> for Cell {
    type Error = LossyInteger;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        if n.unsigned_abs() > MAX_EXACT_INTEGER as u64 {
            return Err(LossyInteger(n));
        }
        Ok(Cell::Number(n as f64))
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(dt: NaiveDateTime) -> Self {
        Cell::Date(dt)
    }
}

impl From<NaiveDate> for Cell {
    fn from(d: NaiveDate) -> Self {
        Cell::Date(d.and_time(NaiveTime::MIN))
    }
}
