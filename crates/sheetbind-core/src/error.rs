//! Error types for sheetbind-core

use std::fmt;

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by user-supplied conversions
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while binding, reading or emitting records
#[derive(Debug, Error)]
pub enum Error {
    /// Sheet index does not resolve to a sheet of the workbook
    #[error("sheet index out of range: {index} (count: {count})")]
    SheetIndexOutOfRange { index: usize, count: usize },

    /// Header row lies past the last row of the sheet
    #[error("header row index out of range: {index} (rows: {rows})")]
    HeaderRowIndexOutOfRange { index: usize, rows: usize },

    /// Data start row lies past the last row of the sheet
    #[error("data start row index out of range: {index} (rows: {rows})")]
    DataStartRowIndexOutOfRange { index: usize, rows: usize },

    /// Header column with no field carrying a matching tag
    #[error("no destination field with matching tag for column \"{column}\" at index {index}")]
    NoDestinationField { column: String, index: usize },

    /// Field found, but no coercion applies to its type
    #[error("no unmarshaler for column \"{column}\" at index {index}")]
    NoUnmarshaler { column: String, index: usize },

    /// Invalid sheet name
    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    /// Duplicate sheet name
    #[error("Sheet name already exists: {0}")]
    DuplicateSheetName(String),

    /// A single cell failed to coerce (abort mode)
    #[error(transparent)]
    Field(#[from] FieldError),

    /// Cell failures collected across rows (collect mode)
    #[error(transparent)]
    Content(#[from] ContentError),
}

impl Error {
    /// The field error, if this is an abort-mode failure
    pub fn as_field_error(&self) -> Option<&FieldError> {
        match self {
            Error::Field(e) => Some(e),
            _ => None,
        }
    }

    /// The collected errors, if this is a collect-mode failure
    pub fn as_content_error(&self) -> Option<&ContentError> {
        match self {
            Error::Content(e) => Some(e),
            _ => None,
        }
    }
}

/// Failure converting one cell into one destination value
#[derive(Debug, Error)]
pub enum CoerceError {
    #[error("error formatting string value: {0}")]
    Format(String),

    #[error("error parsing cell as integer value: {0}")]
    InvalidInteger(String),

    #[error("error parsing cell as float value: {0}")]
    InvalidFloat(String),

    #[error("negative integer provided for unsigned field")]
    NegativeUnsigned,

    #[error("numeric overflow, number is too large for this field")]
    Overflow,

    #[error("error parsing cell as date/time value: no recognized format")]
    NoRecognizedFormat,

    #[error("error parsing cell as date/time value: {0}")]
    InvalidDateTime(String),

    /// Error from a `FromStr` field
    #[error("error unmarshalling text: {0}")]
    Text(#[source] BoxError),

    /// Error from an `UnmarshalCell` field
    #[error(transparent)]
    Custom(BoxError),
}

/// A coercion failure located at a row and column of the source sheet
#[derive(Debug, Error)]
#[error("error unmarshalling column \"{column_header}\" in row {}: {source}", .row_index + 1)]
pub struct FieldError {
    /// Physical row index in the sheet (0-based, header rows included)
    pub row_index: usize,
    /// Column index (0-based)
    pub column_index: usize,
    /// Header text of the column
    pub column_header: String,
    #[source]
    pub source: CoerceError,
}

impl FieldError {
    /// The underlying coercion failure
    pub fn cause(&self) -> &CoerceError {
        &self.source
    }
}

/// Field errors accumulated in collect mode
#[derive(Debug)]
pub struct ContentError {
    /// Errors in the order they were encountered
    pub field_errors: Vec<FieldError>,
    /// Whether reading stopped because the configured limit was hit
    pub limit_reached: bool,
}

impl ContentError {
    /// The collected field errors
    pub fn errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    /// The underlying coercion failure of each collected error
    pub fn causes(&self) -> impl Iterator<Item = &CoerceError> {
        self.field_errors.iter().map(FieldError::cause)
    }
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.limit_reached {
            write!(
                f,
                "too many ({}) errors reading data from Excel",
                self.field_errors.len()
            )
        } else {
            write!(
                f,
                "{} errors reading data from Excel",
                self.field_errors.len()
            )
        }
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.field_errors
            .first()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}
