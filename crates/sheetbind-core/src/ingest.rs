//! Row ingestion
//!
//! [`read_workbook`] is the whole read path over an in-memory workbook:
//! select the sheet, check the configured rows exist, bind the header once,
//! then build one record per data row under the configured error policy.

use log::{debug, trace, warn};

use crate::binder::{bind, FieldBinding};
use crate::cell::CellValue;
use crate::error::{ContentError, Error, FieldError, Result};
use crate::options::{ErrorHandling, ReadOptions};
use crate::record::Record;
use crate::sheet::{Sheet, Workbook};

/// A row predicate; a record is kept only if every filter accepts it
pub type RowFilter<'a, R> = &'a dyn Fn(&R) -> bool;

/// Resolve the sheet to read
///
/// A configured sheet name wins over the index. An unknown name falls back
/// to the index.
pub fn select_sheet<'a, R>(workbook: &'a Workbook, options: &ReadOptions<R>) -> Result<&'a Sheet> {
    let mut index = options.sheet_index;
    if let Some(name) = options.sheet_name.as_deref().filter(|n| !n.is_empty()) {
        match workbook.sheet_index(name) {
            Some(found) => index = found,
            None => warn!(
                "sheet {:?} not found, falling back to index {}",
                name, options.sheet_index
            ),
        }
    }
    workbook.sheet(index).ok_or(Error::SheetIndexOutOfRange {
        index,
        count: workbook.sheet_count(),
    })
}

/// Check the header and data start rows lie inside the sheet
pub fn check_row_indices<R>(sheet: &Sheet, options: &ReadOptions<R>) -> Result<()> {
    let rows = sheet.row_count();
    if options.header_row_index >= rows {
        return Err(Error::HeaderRowIndexOutOfRange {
            index: options.header_row_index,
            rows,
        });
    }
    if options.data_start_row_index >= rows {
        return Err(Error::DataStartRowIndexOutOfRange {
            index: options.data_start_row_index,
            rows,
        });
    }
    Ok(())
}

/// Read every data row of the configured sheet as a record
pub fn read_workbook<R: Record>(
    workbook: &Workbook,
    options: &ReadOptions<R>,
    filters: &[RowFilter<'_, R>],
) -> Result<Vec<R>> {
    let sheet = select_sheet(workbook, options)?;
    check_row_indices(sheet, options)?;
    debug!(
        "reading sheet {:?} ({} rows, {} columns)",
        sheet.name(),
        sheet.row_count(),
        sheet.column_count()
    );

    let headers = sheet.row_texts(options.header_row_index);
    let bindings = bind(&headers, R::descriptor(), options)?;
    ingest(sheet, workbook.is_date1904(), &bindings, options, filters)
}

/// Build one record per row from `data_start_row_index` on
///
/// Errors are handled per `options.error_handling`:
/// - `Ignore` leaves the field at its default
/// - `Abort` fails with the first [`FieldError`]; no records are returned
/// - `Collect` gathers errors and fails with a [`ContentError`] at the end,
///   or as soon as `max_unmarshal_errors` is reached
///
/// A configured row error handler replaces both abort and collect.
pub fn ingest<R: Record>(
    sheet: &Sheet,
    date1904: bool,
    bindings: &[FieldBinding<R>],
    options: &ReadOptions<R>,
    filters: &[RowFilter<'_, R>],
) -> Result<Vec<R>> {
    let params = options.coerce_params(date1904);
    let mut collected: Vec<FieldError> = Vec::new();
    let mut records = Vec::new();

    for row_index in options.data_start_row_index..sheet.row_count() {
        let mut record = R::default();

        for binding in bindings {
            let cell = sheet.cell(row_index, binding.column_index());
            let Some(coercion) = binding.coercion() else {
                if let Some(handler) = &options.unused_column_handler {
                    handler(cell, &mut record, binding);
                }
                continue;
            };

            let Err(err) = coercion.apply(&mut record, cell, &params) else {
                continue;
            };
            if options.error_handling == ErrorHandling::Ignore {
                continue;
            }
            if let Some(handler) = &options.row_error_handler {
                handler(cell, &mut record, binding, &err);
                continue;
            }

            let field_error = FieldError {
                row_index,
                column_index: binding.column_index(),
                column_header: binding.header().to_string(),
                source: err,
            };
            if options.error_handling == ErrorHandling::Abort {
                return Err(field_error.into());
            }
            collected.push(field_error);
            if options.max_unmarshal_errors > 0 && collected.len() >= options.max_unmarshal_errors {
                return Err(ContentError {
                    field_errors: collected,
                    limit_reached: true,
                }
                .into());
            }
        }

        if filters.iter().all(|accept| accept(&record)) {
            records.push(record);
        } else {
            trace!("row {} rejected by filter", row_index);
        }
    }

    if !collected.is_empty() {
        return Err(ContentError {
            field_errors: collected,
            limit_reached: false,
        }
        .into());
    }
    Ok(records)
}

/// Call `walk` with every row of a sheet, in order
pub fn walk_rows<F>(workbook: &Workbook, sheet_index: usize, mut walk: F) -> Result<()>
where
    F: FnMut(usize, &[CellValue]),
{
    let sheet = workbook
        .sheet(sheet_index)
        .ok_or(Error::SheetIndexOutOfRange {
            index: sheet_index,
            count: workbook.sheet_count(),
        })?;
    for (index, row) in sheet.rows().enumerate() {
        walk(index, row);
    }
    Ok(())
}
