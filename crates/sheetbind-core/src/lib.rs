//! # sheetbind-core
//!
//! Tag-driven binding between spreadsheet rows and typed records.
//!
//! This crate holds everything that does not touch a file:
//! - [`CellValue`], [`Sheet`] and [`Workbook`] - the in-memory grid a file reader fills
//! - [`value`] - coercion of cells into primitive and date/time fields, and back
//! - [`unmarshal`] - user conversions and the precedence between conversions
//! - [`binder`] - matching header columns to record fields by tag
//! - [`ingest`] - the per-row loop and its error policy
//! - [`emit`] - turning records back into rows
//!
//! Record types describe themselves through [`Record`], normally via
//! `#[derive(Record)]` from the `sheetbind` crate.
//!
//! ## Example
//!
//! ```rust
//! use sheetbind_core::{CellValue, Sheet, Workbook};
//!
//! let mut sheet = Sheet::new("People");
//! sheet.push_row(vec!["Name".into(), "Age".into()]);
//! sheet.push_row(vec!["Ann".into(), CellValue::Number(30.0)]);
//!
//! let mut workbook = Workbook::new();
//! workbook.add_sheet(sheet).unwrap();
//! assert_eq!(workbook.sheet(0).unwrap().row_count(), 2);
//! ```

pub mod binder;
pub mod cell;
pub mod date;
pub mod emit;
pub mod error;
pub mod ingest;
pub mod options;
pub mod record;
pub mod sheet;
pub mod unmarshal;
pub mod value;

pub use binder::FieldBinding;
pub use cell::{CellError, CellValue};
pub use error::{BoxError, CoerceError, ContentError, Error, FieldError, Result};
pub use ingest::RowFilter;
pub use options::{ErrorHandling, ReadOptions, RowErrorHandler, UnusedColumnHandler, WriteOptions};
pub use record::{FieldDescriptor, Record, RecordDescriptor};
pub use sheet::{Sheet, Workbook};
pub use unmarshal::{Coercion, UnmarshalCell};
pub use value::{CoerceParams, IntoCellValue, ScalarKind};
