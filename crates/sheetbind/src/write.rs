//! Writing records to XLSX destinations

use std::io::Write;
use std::path::Path;

use log::warn;

use sheetbind_core::emit::{append_records, append_rows, emit, emit_rows};
use sheetbind_core::sheet::sanitize_sheet_name;
use sheetbind_core::{Record, Sheet, Workbook, WriteOptions};
use sheetbind_xlsx::XlsxWriter;

use crate::error::Result;

/// Sheet name used by the raw row writers
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

fn single_sheet(sheet: Sheet) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    workbook.add_sheet(sheet)?;
    Ok(workbook)
}

/// Write records as a single-sheet XLSX file
///
/// A header row is written even when `records` is empty.
pub fn write_to_path<R: Record, P: AsRef<Path>>(
    path: P,
    records: &[R],
    options: &WriteOptions,
) -> Result<()> {
    let workbook = single_sheet(emit(records, options))?;
    XlsxWriter::write_file(&workbook, path)?;
    Ok(())
}

/// Write records as a single-sheet XLSX file to a stream
pub fn write_to_writer<R: Record, W: Write>(
    writer: W,
    records: &[R],
    options: &WriteOptions,
) -> Result<()> {
    let workbook = single_sheet(emit(records, options))?;
    XlsxWriter::write(&workbook, writer)?;
    Ok(())
}

/// Write raw text rows, with no header handling, as a single-sheet XLSX file
pub fn write_rows_to_path<S: AsRef<str>, P: AsRef<Path>>(path: P, rows: &[Vec<S>]) -> Result<()> {
    let workbook = single_sheet(emit_rows(DEFAULT_SHEET_NAME, rows))?;
    XlsxWriter::write_file(&workbook, path)?;
    Ok(())
}

/// Write raw text rows as a single-sheet XLSX file to a stream
pub fn write_rows_to_writer<S: AsRef<str>, W: Write>(writer: W, rows: &[Vec<S>]) -> Result<()> {
    let workbook = single_sheet(emit_rows(DEFAULT_SHEET_NAME, rows))?;
    XlsxWriter::write(&workbook, writer)?;
    Ok(())
}

/// Builds a workbook of several sheets before saving it once
///
/// Writing to a sheet name that is already present appends below its last
/// row. Names match case-insensitively, so `"Data"` and `"data"` are the same
/// sheet. Names that are not valid sheet names are sanitized.
///
/// ```no_run
/// use sheetbind::prelude::*;
///
/// #[derive(Default, Record)]
/// struct Total {
///     #[sheet(excel = "Region")]
///     region: String,
///     #[sheet(excel = "Sum")]
///     sum: f64,
/// }
///
/// let mut writer = SheetWriter::new();
/// writer
///     .write("Q1", &[Total { region: "north".into(), sum: 12.5 }], &WriteOptions::default())
///     .unwrap();
/// writer.write_rows("Notes", &[vec!["generated"]]).unwrap();
/// writer.save("totals.xlsx").unwrap();
/// ```
#[derive(Debug, Default)]
pub struct SheetWriter {
    workbook: Workbook,
}

impl SheetWriter {
    /// Create a writer with no sheets
    pub fn new() -> Self {
        Self::default()
    }

    /// Add records (with their header row) to a sheet
    pub fn write<R: Record>(
        &mut self,
        sheet_name: &str,
        records: &[R],
        options: &WriteOptions,
    ) -> Result<&mut Self> {
        let sheet = self.sheet_mut(sheet_name)?;
        append_records(sheet, records, options);
        Ok(self)
    }

    /// Add raw text rows to a sheet
    pub fn write_rows<S: AsRef<str>>(&mut self, sheet_name: &str, rows: &[Vec<S>]) -> Result<&mut Self> {
        let sheet = self.sheet_mut(sheet_name)?;
        append_rows(sheet, rows);
        Ok(self)
    }

    /// The workbook built so far
    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    /// Save all sheets to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        XlsxWriter::write_file(&self.workbook, path)?;
        Ok(())
    }

    /// Write all sheets to a stream
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        XlsxWriter::write(&self.workbook, writer)?;
        Ok(())
    }

    fn sheet_mut(&mut self, sheet_name: &str) -> Result<&mut Sheet> {
        let name = sanitize_sheet_name(sheet_name);
        if name != sheet_name {
            warn!("sheet name {:?} sanitized to {:?}", sheet_name, name);
        }
        Ok(self.workbook.sheet_or_insert(&name)?)
    }
}
