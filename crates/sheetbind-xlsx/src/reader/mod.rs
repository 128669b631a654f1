//! XLSX reader

mod workbook_props;

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use calamine::{open_workbook_from_rs, CellErrorType, Data, Range, Reader, Xlsx};
use log::debug;

use crate::error::XlsxResult;
use sheetbind_core::{CellError, CellValue, Sheet, Workbook};

use workbook_props::read_date1904;

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Read a workbook from an in-memory buffer
    pub fn read_bytes(bytes: &[u8]) -> XlsxResult<Workbook> {
        Self::read(Cursor::new(bytes))
    }

    /// Read a workbook from a random-access reader
    ///
    /// Every sheet is materialized. The reader is read twice, once for the
    /// workbook properties and once for the cells.
    pub fn read<R: Read + Seek>(mut reader: R) -> XlsxResult<Workbook> {
        let start = reader.stream_position()?;
        let date1904 = read_date1904(&mut reader)?;
        reader.seek(SeekFrom::Start(start))?;

        let mut xlsx: Xlsx<R> = open_workbook_from_rs(reader)?;
        let mut workbook = Workbook::new();
        workbook.set_date1904(date1904);

        for name in xlsx.sheet_names() {
            let range = xlsx.worksheet_range(&name)?;
            let sheet = Self::read_sheet(&name, &range);
            debug!(
                "read sheet {:?}: {} rows, {} columns",
                name,
                sheet.row_count(),
                sheet.column_count()
            );
            workbook.add_sheet(sheet)?;
        }

        Ok(workbook)
    }

    /// Lay a calamine range out on a sheet at its absolute position
    fn read_sheet(name: &str, range: &Range<Data>) -> Sheet {
        let mut sheet = Sheet::new(name);
        let (start_row, start_col) = range.start().unwrap_or_default();

        for _ in 0..start_row {
            sheet.push_row(Vec::new());
        }
        for row in range.rows() {
            let mut cells = vec![CellValue::Empty; start_col as usize];
            cells.extend(row.iter().map(convert_value));
            sheet.push_row(cells);
        }
        sheet
    }
}

fn convert_value(value: &Data) -> CellValue {
    match value {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Error(e) => CellValue::Error(match e {
            CellErrorType::Div0 => CellError::Div0,
            CellErrorType::NA => CellError::Na,
            CellErrorType::Name => CellError::Name,
            CellErrorType::Null => CellError::Null,
            CellErrorType::Num => CellError::Num,
            CellErrorType::Ref => CellError::Ref,
            CellErrorType::Value => CellError::Value,
            _ => CellError::Value,
        }),
        // Serial value; the epoch is applied by the consumer
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
    }
}
