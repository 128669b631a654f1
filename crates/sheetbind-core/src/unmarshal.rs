//! Choosing the conversion for a destination field
//!
//! User conversions win over built-in ones, and dates win over generic text
//! parsing. [`resolve`] walks a field's capabilities in that order.

use std::str::FromStr;

use crate::cell::CellValue;
use crate::error::{BoxError, CoerceError};
use crate::record::{CellSetter, FieldDescriptor, Primitive, TextSetter};
use crate::value::CoerceParams;

/// Types that convert themselves from a cell
///
/// Implement this for a field type and mark the field `#[sheet(unmarshal)]`.
///
/// ```
/// use sheetbind_core::{BoxError, CellValue, CoerceParams, UnmarshalCell};
///
/// #[derive(Default)]
/// struct Celsius(f64);
///
/// impl UnmarshalCell for Celsius {
///     fn unmarshal_cell(&mut self, cell: &CellValue, _: &CoerceParams) -> Result<(), BoxError> {
///         let text = cell.raw_text();
///         let degrees = text.trim_end_matches("°C").trim().parse()?;
///         self.0 = degrees;
///         Ok(())
///     }
/// }
/// ```
pub trait UnmarshalCell {
    fn unmarshal_cell(&mut self, cell: &CellValue, params: &CoerceParams) -> Result<(), BoxError>;
}

/// Run a field's `UnmarshalCell` implementation
pub fn apply_cell_unmarshaler<T: UnmarshalCell>(
    dest: &mut T,
    cell: &CellValue,
    params: &CoerceParams,
) -> Result<(), CoerceError> {
    dest.unmarshal_cell(cell, params).map_err(CoerceError::Custom)
}

/// Parse raw cell text into a `FromStr` field
pub fn apply_from_str<T>(dest: &mut T, text: &str) -> Result<(), CoerceError>
where
    T: FromStr,
    T::Err: Into<BoxError>,
{
    *dest = text.parse().map_err(|e: T::Err| CoerceError::Text(e.into()))?;
    Ok(())
}

/// The conversion bound to a column
pub enum Coercion<R> {
    /// User-supplied cell conversion
    Unmarshaler(CellSetter<R>),
    /// Native date or fallback formats
    DateTime(CellSetter<R>),
    /// `FromStr` over the raw cell text
    Text(TextSetter<R>),
    /// Built-in coercion by primitive kind
    Primitive(Primitive<R>),
}

impl<R> Clone for Coercion<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Coercion<R> {}

impl<R> Coercion<R> {
    /// Convert a cell into the bound field of a record
    pub fn apply(
        &self,
        record: &mut R,
        cell: &CellValue,
        params: &CoerceParams,
    ) -> Result<(), CoerceError> {
        match self {
            Coercion::Unmarshaler(set) | Coercion::DateTime(set) => set(record, cell, params),
            Coercion::Text(set) => set(record, &cell.raw_text()),
            Coercion::Primitive(primitive) => (primitive.set)(record, cell, params),
        }
    }

    /// Short name of the strategy, for logging
    pub fn name(&self) -> &'static str {
        match self {
            Coercion::Unmarshaler(_) => "unmarshaler",
            Coercion::DateTime(_) => "datetime",
            Coercion::Text(_) => "text",
            Coercion::Primitive(_) => "primitive",
        }
    }
}

/// Pick the conversion for a field, or `None` if nothing applies
pub fn resolve<R>(field: &FieldDescriptor<R>) -> Option<Coercion<R>> {
    if let Some(set) = field.cell_unmarshaler {
        return Some(Coercion::Unmarshaler(set));
    }
    if let Some(set) = field.datetime {
        return Some(Coercion::DateTime(set));
    }
    if let Some(set) = field.text_unmarshaler {
        return Some(Coercion::Text(set));
    }
    field.primitive.map(Coercion::Primitive)
}
