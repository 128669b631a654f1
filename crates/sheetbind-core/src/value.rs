//! Value coercion between cells and typed fields
//!
//! [`coerce`] is the runtime dispatcher: given a cell and a destination
//! [`ScalarKind`] it produces a [`Scalar`] or a [`CoerceError`]. Typed callers
//! go through [`coerce_into`] and [`coerce_pointer`], which narrow the scalar
//! into the concrete field type via [`FromScalar`].
//!
//! The write direction is [`IntoCellValue`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::cell::CellValue;
use crate::date;
use crate::error::CoerceError;

/// Integers beyond this magnitude lose precision as an f64 cell
const MAX_EXACT_INT: u64 = 1 << 53;

/// Parameters shared by every coercion of one read call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoerceParams {
    /// Trim whitespace from string values
    pub trim_space: bool,
    /// Serial dates count from 1904-01-01
    pub date1904: bool,
    /// chrono formats tried in order against the raw text of non-date cells
    pub fallback_date_formats: Vec<String>,
    /// Empty cells leave optional fields as they were instead of being coerced
    pub empty_as_none: bool,
}

/// Destination kinds a cell can be coerced into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    DateTime,
}

impl ScalarKind {
    fn int_bits(self) -> Option<u32> {
        match self {
            ScalarKind::I8 | ScalarKind::U8 => Some(8),
            ScalarKind::I16 | ScalarKind::U16 => Some(16),
            ScalarKind::I32 | ScalarKind::U32 => Some(32),
            ScalarKind::I64 | ScalarKind::U64 => Some(64),
            ScalarKind::Isize | ScalarKind::Usize => Some(usize::BITS),
            _ => None,
        }
    }

    fn is_unsigned(self) -> bool {
        matches!(
            self,
            ScalarKind::U8 | ScalarKind::U16 | ScalarKind::U32 | ScalarKind::U64 | ScalarKind::Usize
        )
    }
}

/// A coerced value, before narrowing into the field type
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    DateTime(NaiveDateTime),
}

/// Coerce a cell into a value of the given kind
pub fn coerce(
    cell: &CellValue,
    kind: ScalarKind,
    params: &CoerceParams,
) -> Result<Scalar, CoerceError> {
    match kind {
        ScalarKind::String => {
            let text = cell.formatted_text(params.date1904)?;
            if params.trim_space {
                Ok(Scalar::String(text.trim().to_string()))
            } else {
                Ok(Scalar::String(text))
            }
        }
        ScalarKind::Bool => Ok(Scalar::Bool(cell.truthy())),
        ScalarKind::F32 => {
            let v = cell.parse_f64()?;
            if v.is_finite() && v.abs() > f32::MAX as f64 {
                return Err(CoerceError::Overflow);
            }
            Ok(Scalar::Float(v))
        }
        ScalarKind::F64 => Ok(Scalar::Float(cell.parse_f64()?)),
        ScalarKind::DateTime => Ok(Scalar::DateTime(coerce_datetime(cell, params)?)),
        int if int.is_unsigned() => {
            let v = cell.parse_u64()?;
            let bits = int.int_bits().unwrap_or(64);
            if bits < 64 && v >> bits != 0 {
                return Err(CoerceError::Overflow);
            }
            Ok(Scalar::Uint(v))
        }
        int => {
            let v = cell.parse_i64()?;
            let bits = int.int_bits().unwrap_or(64);
            if bits < 64 {
                let max = (1i64 << (bits - 1)) - 1;
                let min = -(1i64 << (bits - 1));
                if v < min || v > max {
                    return Err(CoerceError::Overflow);
                }
            }
            Ok(Scalar::Int(v))
        }
    }
}

/// Coerce a cell into a date/time
///
/// Natively date-typed cells convert under the workbook epoch. Anything else,
/// or a native date that fails to convert, is matched against each fallback
/// format in order.
pub fn coerce_datetime(
    cell: &CellValue,
    params: &CoerceParams,
) -> Result<NaiveDateTime, CoerceError> {
    if let Some(dt) = cell.as_datetime(params.date1904) {
        return Ok(dt);
    }
    let text = cell.raw_text();
    let text = text.trim();
    for format in &params.fallback_date_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(dt);
        }
        if let Ok(d) = NaiveDate::parse_from_str(text, format) {
            return Ok(d.and_time(NaiveTime::MIN));
        }
    }
    Err(CoerceError::NoRecognizedFormat)
}

/// Field types the built-in coercions can produce
pub trait FromScalar: Sized {
    /// Kind requested from [`coerce`]
    const KIND: ScalarKind;

    /// Narrow a scalar of kind [`Self::KIND`] into this type
    fn from_scalar(scalar: Scalar) -> Result<Self, CoerceError>;
}

fn mismatch(scalar: &Scalar) -> CoerceError {
    CoerceError::Format(format!("unexpected scalar {scalar:?}"))
}

impl FromScalar for String {
    const KIND: ScalarKind = ScalarKind::String;

    fn from_scalar(scalar: Scalar) -> Result<Self, CoerceError> {
        match scalar {
            Scalar::String(s) => Ok(s),
            other => Err(mismatch(&other)),
        }
    }
}

impl FromScalar for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    fn from_scalar(scalar: Scalar) -> Result<Self, CoerceError> {
        match scalar {
            Scalar::Bool(b) => Ok(b),
            other => Err(mismatch(&other)),
        }
    }
}

macro_rules! impl_from_scalar_int {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl FromScalar for $ty {
                const KIND: ScalarKind = ScalarKind::$kind;

                fn from_scalar(scalar: Scalar) -> Result<Self, CoerceError> {
                    match scalar {
                        Scalar::Int(v) => <$ty>::try_from(v).map_err(|_| CoerceError::Overflow),
                        Scalar::Uint(v) => <$ty>::try_from(v).map_err(|_| CoerceError::Overflow),
                        other => Err(mismatch(&other)),
                    }
                }
            }
        )*
    };
}

impl_from_scalar_int!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
);

impl FromScalar for f32 {
    const KIND: ScalarKind = ScalarKind::F32;

    fn from_scalar(scalar: Scalar) -> Result<Self, CoerceError> {
        match scalar {
            Scalar::Float(v) => Ok(v as f32),
            other => Err(mismatch(&other)),
        }
    }
}

impl FromScalar for f64 {
    const KIND: ScalarKind = ScalarKind::F64;

    fn from_scalar(scalar: Scalar) -> Result<Self, CoerceError> {
        match scalar {
            Scalar::Float(v) => Ok(v),
            other => Err(mismatch(&other)),
        }
    }
}

impl FromScalar for NaiveDateTime {
    const KIND: ScalarKind = ScalarKind::DateTime;

    fn from_scalar(scalar: Scalar) -> Result<Self, CoerceError> {
        match scalar {
            Scalar::DateTime(dt) => Ok(dt),
            other => Err(mismatch(&other)),
        }
    }
}

impl FromScalar for NaiveDate {
    const KIND: ScalarKind = ScalarKind::DateTime;

    fn from_scalar(scalar: Scalar) -> Result<Self, CoerceError> {
        NaiveDateTime::from_scalar(scalar).map(|dt| dt.date())
    }
}

impl FromScalar for DateTime<Utc> {
    const KIND: ScalarKind = ScalarKind::DateTime;

    fn from_scalar(scalar: Scalar) -> Result<Self, CoerceError> {
        NaiveDateTime::from_scalar(scalar).map(|dt| dt.and_utc())
    }
}

/// Coerce a cell into a field, leaving it untouched on error
pub fn coerce_into<T: FromScalar>(
    dest: &mut T,
    cell: &CellValue,
    params: &CoerceParams,
) -> Result<(), CoerceError> {
    let scalar = coerce(cell, T::KIND, params)?;
    *dest = T::from_scalar(scalar)?;
    Ok(())
}

/// Coerce a cell into an optional field
///
/// The field becomes `Some` only when coercion succeeds and is untouched on
/// error. Empty cells go through the same rules as any other cell: an empty
/// string field reads `Some("")` and an empty number field is an error. With
/// [`CoerceParams::empty_as_none`] set, empty cells and cells holding empty
/// text leave the field as it was.
pub fn coerce_pointer<T: FromScalar>(
    dest: &mut Option<T>,
    cell: &CellValue,
    params: &CoerceParams,
) -> Result<(), CoerceError> {
    if params.empty_as_none && (cell.is_empty() || cell.as_string() == Some("")) {
        return Ok(());
    }
    let scalar = coerce(cell, T::KIND, params)?;
    *dest = Some(T::from_scalar(scalar)?);
    Ok(())
}

/// Field types that can be written to a cell
pub trait IntoCellValue {
    fn to_cell_value(&self) -> CellValue;
}

impl IntoCellValue for String {
    fn to_cell_value(&self) -> CellValue {
        CellValue::String(self.clone())
    }
}

impl IntoCellValue for str {
    fn to_cell_value(&self) -> CellValue {
        CellValue::string(self)
    }
}

impl IntoCellValue for bool {
    fn to_cell_value(&self) -> CellValue {
        CellValue::Boolean(*self)
    }
}

macro_rules! impl_into_cell_small_int {
    ($($ty:ty),*) => {
        $(
            impl IntoCellValue for $ty {
                fn to_cell_value(&self) -> CellValue {
                    CellValue::Number(f64::from(*self))
                }
            }
        )*
    };
}

impl_into_cell_small_int!(i8, i16, i32, u8, u16, u32);

macro_rules! impl_into_cell_wide_int {
    ($($ty:ty),*) => {
        $(
            impl IntoCellValue for $ty {
                fn to_cell_value(&self) -> CellValue {
                    // Written as text past 2^53 so the value reads back exactly
                    if (*self as i128).unsigned_abs() > MAX_EXACT_INT as u128 {
                        CellValue::String(self.to_string())
                    } else {
                        CellValue::Number(*self as f64)
                    }
                }
            }
        )*
    };
}

impl_into_cell_wide_int!(i64, isize, u64, usize);

impl IntoCellValue for f32 {
    fn to_cell_value(&self) -> CellValue {
        CellValue::Number(f64::from(*self))
    }
}

impl IntoCellValue for f64 {
    fn to_cell_value(&self) -> CellValue {
        CellValue::Number(*self)
    }
}

/// Date/times outside the serial range (before 1899-12-30 or after
/// 9999-12-31) are written as [`date::TEXT_DATETIME_FORMAT`] text, which reads
/// back through a matching fallback date format.
impl IntoCellValue for NaiveDateTime {
    fn to_cell_value(&self) -> CellValue {
        let serial = date::datetime_to_serial(self, false);
        if date::serial_to_datetime(serial, false).is_some() {
            CellValue::DateTime(serial)
        } else {
            CellValue::String(self.format(date::TEXT_DATETIME_FORMAT).to_string())
        }
    }
}

impl IntoCellValue for NaiveDate {
    fn to_cell_value(&self) -> CellValue {
        self.and_time(NaiveTime::MIN).to_cell_value()
    }
}

impl IntoCellValue for DateTime<Utc> {
    fn to_cell_value(&self) -> CellValue {
        self.naive_utc().to_cell_value()
    }
}

impl IntoCellValue for CellValue {
    fn to_cell_value(&self) -> CellValue {
        self.clone()
    }
}

impl<T: IntoCellValue> IntoCellValue for Option<T> {
    fn to_cell_value(&self) -> CellValue {
        match self {
            Some(v) => v.to_cell_value(),
            None => CellValue::Empty,
        }
    }
}

impl<T: IntoCellValue + ?Sized> IntoCellValue for &T {
    fn to_cell_value(&self) -> CellValue {
        (**self).to_cell_value()
    }
}

impl<T: IntoCellValue + ?Sized> IntoCellValue for Box<T> {
    fn to_cell_value(&self) -> CellValue {
        (**self).to_cell_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> CoerceParams {
        CoerceParams::default()
    }

    #[test]
    fn test_string_trim_space() {
        let cell = CellValue::string("  x  ");
        let mut s = String::new();
        coerce_into(&mut s, &cell, &params()).unwrap();
        assert_eq!(s, "  x  ");

        let trimming = CoerceParams {
            trim_space: true,
            ..params()
        };
        coerce_into(&mut s, &cell, &trimming).unwrap();
        assert_eq!(s, "x");
    }

    #[test]
    fn test_string_from_number_and_bool() {
        let mut s = String::new();
        coerce_into(&mut s, &CellValue::Number(42.0), &params()).unwrap();
        assert_eq!(s, "42");
        coerce_into(&mut s, &CellValue::Boolean(false), &params()).unwrap();
        assert_eq!(s, "FALSE");
    }

    #[test]
    fn test_bool_never_fails() {
        let mut b = true;
        coerce_into(&mut b, &CellValue::string("nope"), &params()).unwrap();
        assert!(!b);
        coerce_into(&mut b, &CellValue::Boolean(true), &params()).unwrap();
        assert!(b);
    }

    #[test]
    fn test_i8_overflow() {
        let mut v: i8 = 0;
        assert!(matches!(
            coerce_into(&mut v, &CellValue::Number(128.0), &params()),
            Err(CoerceError::Overflow)
        ));
        coerce_into(&mut v, &CellValue::Number(-128.0), &params()).unwrap();
        assert_eq!(v, -128);
    }

    #[test]
    fn test_int_widths() {
        let mut a: i16 = 0;
        assert!(coerce_into(&mut a, &CellValue::Number(32768.0), &params()).is_err());
        let mut b: i32 = 0;
        coerce_into(&mut b, &CellValue::string("-2147483648"), &params()).unwrap();
        assert_eq!(b, i32::MIN);
        let mut c: i64 = 0;
        coerce_into(&mut c, &CellValue::string("9223372036854775807"), &params()).unwrap();
        assert_eq!(c, i64::MAX);
    }

    #[test]
    fn test_int_rejects_fraction() {
        let mut v: i32 = 7;
        let err = coerce_into(&mut v, &CellValue::Number(1.5), &params()).unwrap_err();
        assert!(matches!(err, CoerceError::InvalidInteger(_)));
        assert_eq!(v, 7);
    }

    #[test]
    fn test_unsigned() {
        let mut v: u32 = 0;
        assert!(matches!(
            coerce_into(&mut v, &CellValue::Number(-123.0), &params()),
            Err(CoerceError::NegativeUnsigned)
        ));
        coerce_into(&mut v, &CellValue::Number(123.0), &params()).unwrap();
        assert_eq!(v, 123);

        let mut w: u8 = 0;
        assert!(matches!(
            coerce_into(&mut w, &CellValue::Number(256.0), &params()),
            Err(CoerceError::Overflow)
        ));
        let mut x: u64 = 0;
        coerce_into(&mut x, &CellValue::string("18446744073709551615"), &params()).unwrap();
        assert_eq!(x, u64::MAX);
    }

    #[test]
    fn test_float() {
        let mut f: f32 = 0.0;
        assert!(matches!(
            coerce_into(&mut f, &CellValue::Number(1e39), &params()),
            Err(CoerceError::Overflow)
        ));
        coerce_into(&mut f, &CellValue::string("2.5"), &params()).unwrap();
        assert_eq!(f, 2.5);

        let mut d: f64 = 0.0;
        assert!(matches!(
            coerce_into(&mut d, &CellValue::string("abc"), &params()),
            Err(CoerceError::InvalidFloat(_))
        ));
        coerce_into(&mut d, &CellValue::Number(1e300), &params()).unwrap();
        assert_eq!(d, 1e300);
    }

    #[test]
    fn test_datetime_native_and_1904() {
        let cell = CellValue::DateTime(12000.0);
        let dt = coerce_datetime(&cell, &params()).unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(1932, 11, 7).unwrap());

        let p1904 = CoerceParams {
            date1904: true,
            ..params()
        };
        let dt = coerce_datetime(&cell, &p1904).unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(1936, 11, 8).unwrap());
    }

    #[test]
    fn test_datetime_fallback_formats() {
        let p = CoerceParams {
            fallback_date_formats: vec!["%Y-%m-%d %H:%M".into(), "%d.%m.%Y".into()],
            ..params()
        };
        let dt = coerce_datetime(&CellValue::string("07.11.1932"), &p).unwrap();
        assert_eq!(
            dt,
            NaiveDate::from_ymd_opt(1932, 11, 7)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
        let dt = coerce_datetime(&CellValue::string("2020-02-03 04:05"), &p).unwrap();
        assert_eq!(dt.to_string(), "2020-02-03 04:05:00");

        assert!(matches!(
            coerce_datetime(&CellValue::string("garbage"), &p),
            Err(CoerceError::NoRecognizedFormat)
        ));
    }

    #[test]
    fn test_datetime_bad_serial_uses_fallback() {
        let p = CoerceParams {
            fallback_date_formats: vec!["%Y".into()],
            ..params()
        };
        assert!(matches!(
            coerce_datetime(&CellValue::DateTime(-3.0), &p),
            Err(CoerceError::NoRecognizedFormat)
        ));
    }

    #[test]
    fn test_pointer_set_only_on_success() {
        let mut p: Option<i32> = None;
        assert!(coerce_pointer(&mut p, &CellValue::string("x"), &params()).is_err());
        assert_eq!(p, None);
        coerce_pointer(&mut p, &CellValue::Number(5.0), &params()).unwrap();
        assert_eq!(p, Some(5));
    }

    #[test]
    fn test_pointer_empty_cell_is_coerced() {
        let mut n: Option<i32> = None;
        assert!(coerce_pointer(&mut n, &CellValue::Empty, &params()).is_err());
        assert_eq!(n, None);

        let mut s: Option<String> = None;
        coerce_pointer(&mut s, &CellValue::Empty, &params()).unwrap();
        assert_eq!(s, Some(String::new()));

        let mut b: Option<bool> = None;
        coerce_pointer(&mut b, &CellValue::Empty, &params()).unwrap();
        assert_eq!(b, Some(false));
    }

    #[test]
    fn test_pointer_empty_as_none() {
        let p = CoerceParams {
            empty_as_none: true,
            ..params()
        };
        let mut n: Option<i32> = None;
        coerce_pointer(&mut n, &CellValue::Empty, &p).unwrap();
        assert_eq!(n, None);
        let mut s: Option<String> = None;
        coerce_pointer(&mut s, &CellValue::Empty, &p).unwrap();
        coerce_pointer(&mut s, &CellValue::string(""), &p).unwrap();
        assert_eq!(s, None);
        coerce_pointer(&mut s, &CellValue::string(" "), &p).unwrap();
        assert_eq!(s.as_deref(), Some(" "));
        coerce_pointer(&mut n, &CellValue::Number(7.0), &p).unwrap();
        assert_eq!(n, Some(7));
    }

    #[test]
    fn test_out_of_range_dates_written_as_text() {
        let early = NaiveDate::from_ymd_opt(1899, 6, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        assert_eq!(
            early.to_cell_value(),
            CellValue::string("1899-06-01 08:30:00")
        );
        assert_eq!(
            early.date().to_cell_value(),
            CellValue::string("1899-06-01 00:00:00")
        );
        let p = CoerceParams {
            fallback_date_formats: vec![date::TEXT_DATETIME_FORMAT.into()],
            ..params()
        };
        assert_eq!(coerce_datetime(&early.to_cell_value(), &p).unwrap(), early);

        let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
            .unwrap()
            .and_time(NaiveTime::MIN);
        assert_eq!(epoch.to_cell_value(), CellValue::DateTime(0.0));
    }

    #[test]
    fn test_wide_ints_written_as_text() {
        assert_eq!(5i64.to_cell_value(), CellValue::Number(5.0));
        assert_eq!(
            u64::MAX.to_cell_value(),
            CellValue::string("18446744073709551615")
        );
        assert_eq!(
            i64::MIN.to_cell_value(),
            CellValue::string("-9223372036854775808")
        );
        assert_eq!(None::<i32>.to_cell_value(), CellValue::Empty);
    }
}
