//! # sheetbind-xlsx
//!
//! XLSX reader and writer for sheetbind.
//!
//! Cell content is read with calamine and written with rust_xlsxwriter. The
//! workbook date system is read from `xl/workbook.xml` directly.

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use writer::XlsxWriter;
