//! Error types for sheetbind

use thiserror::Error;

use sheetbind_core::{ContentError, FieldError};
use sheetbind_xlsx::XlsxError;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the read and write entry points
#[derive(Debug, Error)]
pub enum Error {
    /// Structural, binding or cell coercion failure
    #[error(transparent)]
    Bind(#[from] sheetbind_core::Error),

    /// The file could not be read or written
    #[error(transparent)]
    Xlsx(#[from] XlsxError),

    /// Reading a stream into memory failed
    #[error("error buffering spreadsheet source: {0}")]
    Buffer(#[source] std::io::Error),
}

impl Error {
    /// The field error, if the read aborted on a cell
    pub fn as_field_error(&self) -> Option<&FieldError> {
        match self {
            Error::Bind(e) => e.as_field_error(),
            _ => None,
        }
    }

    /// The collected errors, if the read ran in collect mode
    pub fn as_content_error(&self) -> Option<&ContentError> {
        match self {
            Error::Bind(e) => e.as_content_error(),
            _ => None,
        }
    }
}
