//! Reading records from XLSX sources

use std::io::{Read, Seek};
use std::path::Path;

use sheetbind_core::ingest::{read_workbook, walk_rows};
use sheetbind_core::{CellValue, ReadOptions, Record, RowFilter, Workbook};
use sheetbind_xlsx::XlsxReader;

use crate::error::{Error, Result};

fn read_parsed<R: Record>(
    workbook: &Workbook,
    options: &ReadOptions<R>,
    filters: &[RowFilter<'_, R>],
) -> Result<Vec<R>> {
    Ok(read_workbook(workbook, options, filters)?)
}

/// Read records from an in-memory XLSX file
///
/// ```no_run
/// use sheetbind::prelude::*;
///
/// #[derive(Debug, Default, Record)]
/// struct Person {
///     #[sheet(excel = "Name")]
///     name: String,
///     #[sheet(excel = "Age")]
///     age: u8,
/// }
///
/// let bytes = std::fs::read("people.xlsx").unwrap();
/// let adults = |p: &Person| p.age >= 18;
/// let people = read_from_bytes::<Person>(&bytes, &ReadOptions::default(), &[&adults]).unwrap();
/// println!("{people:?}");
/// ```
pub fn read_from_bytes<R: Record>(
    bytes: &[u8],
    options: &ReadOptions<R>,
    filters: &[RowFilter<'_, R>],
) -> Result<Vec<R>> {
    let workbook = XlsxReader::read_bytes(bytes)?;
    read_parsed(&workbook, options, filters)
}

/// Read records from an XLSX file on disk
pub fn read_from_path<R: Record, P: AsRef<Path>>(
    path: P,
    options: &ReadOptions<R>,
    filters: &[RowFilter<'_, R>],
) -> Result<Vec<R>> {
    let workbook = XlsxReader::read_file(path)?;
    read_parsed(&workbook, options, filters)
}

/// Read records from a forward-only stream
///
/// The archive format needs random access, so the whole stream is buffered
/// in memory first.
pub fn read_from_reader<R: Record, S: Read>(
    mut reader: S,
    options: &ReadOptions<R>,
    filters: &[RowFilter<'_, R>],
) -> Result<Vec<R>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(Error::Buffer)?;
    read_from_bytes(&bytes, options, filters)
}

/// Read records from a random-access source without buffering it
pub fn read_from_seekable<R: Record, S: Read + Seek>(
    reader: S,
    options: &ReadOptions<R>,
    filters: &[RowFilter<'_, R>],
) -> Result<Vec<R>> {
    let workbook = XlsxReader::read(reader)?;
    read_parsed(&workbook, options, filters)
}

/// Call `walk` with the index and cells of every row of a sheet
///
/// No header handling or binding takes place.
pub fn walk_sheet<P, F>(path: P, sheet_index: usize, walk: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnMut(usize, &[CellValue]),
{
    let workbook = XlsxReader::read_file(path)?;
    walk_rows(&workbook, sheet_index, walk)?;
    Ok(())
}
