//! XLSX error types

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur during XLSX reading/writing
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// Cell content could not be read
    #[error("Read error: {0}")]
    Read(#[from] calamine::XlsxError),

    /// Workbook could not be written
    #[error("Write error: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    /// Position past the sheet limits
    #[error("Cell ({0}, {1}) is outside the sheet limits")]
    OutOfBounds(usize, usize),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] sheetbind_core::Error),
}
