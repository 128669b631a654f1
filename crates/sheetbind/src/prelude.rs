//! Prelude module - common imports for sheetbind users
//!
//! ```rust
//! use sheetbind::prelude::*;
//! ```

pub use crate::{
    // Record types
    CellValue,
    // Options
    ErrorHandling,
    FieldBinding,
    IntoCellValue,
    ReadOptions,
    Record,
    UnmarshalCell,
    WriteOptions,

    // Error types
    BoxError,
    CoerceError,
    ContentError,
    Error,
    FieldError,
    Result,

    // Read and write
    read_from_bytes,
    read_from_path,
    read_from_reader,
    read_from_seekable,
    walk_sheet,
    write_rows_to_path,
    write_rows_to_writer,
    write_to_path,
    write_to_writer,
    SheetWriter,
};
