//! # sheetbind
//!
//! Read spreadsheet rows into typed records and write records back out,
//! with columns matched to fields by header tags.
//!
//! ## Features
//!
//! - `#[derive(Record)]` with per-field tags, `#[sheet(excel = "Header")]`
//! - Coercion of text, numeric, boolean and date cells into primitive and
//!   chrono fields, including `Option`s of them
//! - Custom conversions through [`UnmarshalCell`] or `FromStr`
//! - Abort, collect or ignore policies for per-cell failures, plus hooks for
//!   failed cells and unbound columns
//! - Row filters, raw row walking and multi-sheet writing
//!
//! ## Example
//!
//! ```rust
//! use sheetbind::prelude::*;
//! use std::io::Cursor;
//!
//! #[derive(Debug, Default, PartialEq, Record)]
//! struct Person {
//!     #[sheet(excel = "Name")]
//!     name: String,
//!     #[sheet(excel = "Age")]
//!     age: u8,
//! }
//!
//! let people = vec![Person { name: "Ann".into(), age: 30 }];
//!
//! let mut buf = Vec::new();
//! write_to_writer(&mut buf, &people, &WriteOptions::default()).unwrap();
//!
//! let read: Vec<Person> = read_from_seekable(Cursor::new(&buf), &ReadOptions::default(), &[]).unwrap();
//! assert_eq!(read, people);
//! ```

pub mod error;
pub mod prelude;
mod read;
mod write;

pub use chrono;
pub use sheetbind_derive::Record;

// Core modules, also used by derive-generated code
pub use sheetbind_core::{binder, cell, date, emit, ingest, options, record, sheet, unmarshal, value};

// Re-export core types
pub use sheetbind_core::{
    BoxError, CellError, CellValue, CoerceError, CoerceParams, Coercion, ContentError,
    ErrorHandling, FieldBinding, FieldDescriptor, FieldError, IntoCellValue, ReadOptions,
    RecordDescriptor, RowErrorHandler, RowFilter, ScalarKind, Sheet, UnmarshalCell,
    UnusedColumnHandler, Workbook, WriteOptions,
};

// The trait shares its name with the derive macro
pub use sheetbind_core::Record;

// Re-export I/O types
pub use sheetbind_xlsx::{XlsxError, XlsxReader, XlsxWriter};

pub use error::{Error, Result};
pub use read::{read_from_bytes, read_from_path, read_from_reader, read_from_seekable, walk_sheet};
pub use write::{
    write_rows_to_path, write_rows_to_writer, write_to_path, write_to_writer, SheetWriter,
    DEFAULT_SHEET_NAME,
};
