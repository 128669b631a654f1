//! Record emission
//!
//! The write side: one header row derived from tags, then one row per
//! record with one cell per emitted field, both in declaration order.

use crate::cell::CellValue;
use crate::options::WriteOptions;
use crate::record::{FieldDescriptor, Record, RecordDescriptor};
use crate::sheet::Sheet;

/// Fields to emit, paired with their header text
fn emitted_fields<'a, R>(
    descriptor: &'a RecordDescriptor<R>,
    options: &WriteOptions,
) -> Vec<(&'a FieldDescriptor<R>, &'static str)> {
    descriptor
        .fields
        .iter()
        .filter(|field| !field.is_skipped(&options.tag_name))
        .filter_map(|field| match field.tag(&options.tag_name) {
            Some(tag) => Some((field, tag)),
            None if options.ignore_fields_without_tag => None,
            None => Some((field, field.ident)),
        })
        .collect()
}

/// Header row a record type emits under the given options
pub fn headers<R: Record>(options: &WriteOptions) -> Vec<String> {
    emitted_fields(R::descriptor(), options)
        .into_iter()
        .map(|(_, header)| header.to_string())
        .collect()
}

/// Cells of one record, aligned with [`headers`]
pub fn record_cells<R: Record>(record: &R, options: &WriteOptions) -> Vec<CellValue> {
    emitted_fields(R::descriptor(), options)
        .into_iter()
        .map(|(field, _)| match field.marshal {
            Some(get) => get(record),
            None => CellValue::Empty,
        })
        .collect()
}

/// Append a header row and one row per record to a sheet
pub fn append_records<R: Record>(sheet: &mut Sheet, records: &[R], options: &WriteOptions) {
    let fields = emitted_fields(R::descriptor(), options);
    sheet.push_row(
        fields
            .iter()
            .map(|(_, header)| CellValue::string(*header))
            .collect(),
    );
    for record in records {
        sheet.push_row(
            fields
                .iter()
                .map(|(field, _)| field.marshal.map_or(CellValue::Empty, |get| get(record)))
                .collect(),
        );
    }
}

/// Emit records as a new sheet named per the options
///
/// The header row is written even when `records` is empty.
pub fn emit<R: Record>(records: &[R], options: &WriteOptions) -> Sheet {
    let mut sheet = Sheet::new(options.sheet_name.clone());
    append_records(&mut sheet, records, options);
    sheet
}

/// Emit raw text rows as a new sheet
pub fn emit_rows<S: AsRef<str>>(sheet_name: &str, rows: &[Vec<S>]) -> Sheet {
    let mut sheet = Sheet::new(sheet_name);
    append_rows(&mut sheet, rows);
    sheet
}

/// Append raw text rows to a sheet
pub fn append_rows<S: AsRef<str>>(sheet: &mut Sheet, rows: &[Vec<S>]) {
    for row in rows {
        sheet.push_row(row.iter().map(|s| CellValue::string(s.as_ref())).collect());
    }
}
