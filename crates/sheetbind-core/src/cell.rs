//! Cell value types

use std::borrow::Cow;
use std::fmt;
use std::num::IntErrorKind;

use chrono::NaiveDateTime;

use crate::date;
use crate::error::CoerceError;

/// Represents the value stored in a cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Empty cell (no value)
    #[default]
    Empty,

    /// Boolean value (TRUE/FALSE)
    Boolean(bool),

    /// Numeric value
    Number(f64),

    /// String value
    String(String),

    /// Error value (#VALUE!, #REF!, etc.)
    Error(CellError),

    /// Number carrying a date/time display format, stored as its serial
    DateTime(f64),
}

impl CellValue {
    /// Create a new string value
    pub fn string<S: Into<String>>(s: S) -> Self {
        CellValue::String(s.into())
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Check if the cell is natively date-typed
    pub fn is_datetime(&self) -> bool {
        matches!(self, CellValue::DateTime(_))
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) | CellValue::DateTime(n) => Some(*n),
            CellValue::Boolean(true) => Some(1.0),
            CellValue::Boolean(false) => Some(0.0),
            _ => None,
        }
    }

    /// Try to get the value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(b) => Some(*b),
            CellValue::Number(n) => Some(*n != 0.0),
            _ => None,
        }
    }

    /// Try to get the value as a string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean interpretation of any cell; non-boolean content is false
    pub fn truthy(&self) -> bool {
        match self {
            CellValue::String(s) => {
                let s = s.trim();
                s == "1" || s.eq_ignore_ascii_case("true")
            }
            other => other.as_bool().unwrap_or(false),
        }
    }

    /// The stored text of the cell, without any display formatting
    ///
    /// Booleans are `1`/`0` and dates are their serial number.
    pub fn raw_text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Empty => Cow::Borrowed(""),
            CellValue::Boolean(true) => Cow::Borrowed("1"),
            CellValue::Boolean(false) => Cow::Borrowed("0"),
            CellValue::Number(n) | CellValue::DateTime(n) => Cow::Owned(n.to_string()),
            CellValue::String(s) => Cow::Borrowed(s),
            CellValue::Error(e) => Cow::Borrowed(e.as_str()),
        }
    }

    /// The text a spreadsheet application would display for the cell
    ///
    /// Date cells render as `%Y-%m-%d`, with ` %H:%M:%S` when the serial has
    /// a time part. Numbers render as the shortest text that parses back to
    /// the same f64, not through the cell's number format, which the reader
    /// does not expose: `0.1 + 0.2` gives `0.30000000000000004` and a cell
    /// showing `12%` gives `0.12`.
    pub fn formatted_text(&self, date1904: bool) -> Result<String, CoerceError> {
        match self {
            CellValue::DateTime(serial) => {
                let dt = date::serial_to_datetime(*serial, date1904).ok_or_else(|| {
                    CoerceError::Format(format!("date serial {serial} is out of range"))
                })?;
                if serial.fract() == 0.0 {
                    Ok(dt.format("%Y-%m-%d").to_string())
                } else {
                    Ok(dt.format("%Y-%m-%d %H:%M:%S").to_string())
                }
            }
            other => Ok(other.to_string()),
        }
    }

    /// Parse the cell as a 64-bit signed integer
    pub fn parse_i64(&self) -> Result<i64, CoerceError> {
        match self {
            CellValue::Number(n) | CellValue::DateTime(n) => integral(*n),
            CellValue::Boolean(b) => Ok(i64::from(*b)),
            CellValue::String(s) => s.trim().parse::<i64>().map_err(|e| match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => CoerceError::Overflow,
                _ => CoerceError::InvalidInteger(format!("{s:?}: {e}")),
            }),
            CellValue::Empty => Err(CoerceError::InvalidInteger(
                "cannot parse integer from empty string".into(),
            )),
            CellValue::Error(e) => Err(CoerceError::InvalidInteger(e.to_string())),
        }
    }

    /// Parse the cell as a 64-bit unsigned integer
    ///
    /// Negative content fails with [`CoerceError::NegativeUnsigned`].
    pub fn parse_u64(&self) -> Result<u64, CoerceError> {
        match self {
            CellValue::String(s) if !s.trim_start().starts_with('-') => {
                s.trim().parse::<u64>().map_err(|e| match e.kind() {
                    IntErrorKind::PosOverflow => CoerceError::Overflow,
                    _ => CoerceError::InvalidInteger(format!("{s:?}: {e}")),
                })
            }
            CellValue::Number(n) | CellValue::DateTime(n) if *n >= 0.0 => {
                if n.fract() != 0.0 {
                    return Err(CoerceError::InvalidInteger(format!("{n} is not an integer")));
                }
                if *n >= u64::MAX as f64 {
                    return Err(CoerceError::Overflow);
                }
                Ok(*n as u64)
            }
            other => {
                let v = other.parse_i64()?;
                u64::try_from(v).map_err(|_| CoerceError::NegativeUnsigned)
            }
        }
    }

    /// Parse the cell as a 64-bit float
    pub fn parse_f64(&self) -> Result<f64, CoerceError> {
        match self {
            CellValue::Number(n) | CellValue::DateTime(n) => Ok(*n),
            CellValue::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
            CellValue::String(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| CoerceError::InvalidFloat(format!("{s:?}: {e}"))),
            CellValue::Empty => Err(CoerceError::InvalidFloat(
                "cannot parse float from empty string".into(),
            )),
            CellValue::Error(e) => Err(CoerceError::InvalidFloat(e.to_string())),
        }
    }

    /// Native date/time of a date-typed cell under the given epoch
    pub fn as_datetime(&self, date1904: bool) -> Option<NaiveDateTime> {
        match self {
            CellValue::DateTime(serial) => date::serial_to_datetime(*serial, date1904),
            _ => None,
        }
    }
}

fn integral(n: f64) -> Result<i64, CoerceError> {
    if !n.is_finite() || n.fract() != 0.0 {
        return Err(CoerceError::InvalidInteger(format!("{n} is not an integer")));
    }
    // i64::MAX as f64 rounds up to 2^63
    if n < i64::MIN as f64 || n >= i64::MAX as f64 {
        return Err(CoerceError::Overflow);
    }
    Ok(n as i64)
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => write!(f, ""),
            CellValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Number(n) | CellValue::DateTime(n) => write!(f, "{}", n),
            CellValue::String(s) => write!(f, "{}", s),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::string(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<CellError> for CellValue {
    fn from(e: CellError) -> Self {
        CellValue::Error(e)
    }
}

/// Excel error values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellError {
    /// #NULL! - Incorrect range operator
    Null,
    /// #DIV/0! - Division by zero
    Div0,
    /// #VALUE! - Wrong type of argument or operand
    Value,
    /// #REF! - Invalid cell reference
    Ref,
    /// #NAME? - Unrecognized formula name
    Name,
    /// #NUM! - Invalid numeric value
    Num,
    /// #N/A - Value not available
    Na,
    /// #GETTING_DATA - External data is loading
    GettingData,
}

impl CellError {
    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            CellError::Null => "#NULL!",
            CellError::Div0 => "#DIV/0!",
            CellError::Value => "#VALUE!",
            CellError::Ref => "#REF!",
            CellError::Name => "#NAME?",
            CellError::Num => "#NUM!",
            CellError::Na => "#N/A",
            CellError::GettingData => "#GETTING_DATA",
        }
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
