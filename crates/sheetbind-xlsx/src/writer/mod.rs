//! XLSX writer

use std::io::Write;
use std::path::Path;

use rust_xlsxwriter::{Format, Worksheet};

use crate::error::{XlsxError, XlsxResult};
use sheetbind_core::{CellValue, Sheet, Workbook};

const DATE_FORMAT: &str = "yyyy-mm-dd";
const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a workbook to a file path
    pub fn write_file<P: AsRef<Path>>(workbook: &Workbook, path: P) -> XlsxResult<()> {
        let mut book = Self::build(workbook)?;
        book.save(path.as_ref())?;
        Ok(())
    }

    /// Write a workbook to a writer
    pub fn write<W: Write>(workbook: &Workbook, mut writer: W) -> XlsxResult<()> {
        let mut book = Self::build(workbook)?;
        let buf = book.save_to_buffer()?;
        writer.write_all(&buf)?;
        writer.flush()?;
        Ok(())
    }

    fn build(workbook: &Workbook) -> XlsxResult<rust_xlsxwriter::Workbook> {
        let mut book = rust_xlsxwriter::Workbook::new();
        let date_format = Format::new().set_num_format(DATE_FORMAT);
        let datetime_format = Format::new().set_num_format(DATETIME_FORMAT);

        for sheet in workbook.sheets() {
            let worksheet = book.add_worksheet();
            worksheet.set_name(sheet.name())?;
            Self::write_sheet(worksheet, sheet, &date_format, &datetime_format)?;
        }
        Ok(book)
    }

    fn write_sheet(
        worksheet: &mut Worksheet,
        sheet: &Sheet,
        date_format: &Format,
        datetime_format: &Format,
    ) -> XlsxResult<()> {
        for (r, cells) in sheet.rows().enumerate() {
            for (c, value) in cells.iter().enumerate() {
                let (row, col) = match (u32::try_from(r), u16::try_from(c)) {
                    (Ok(row), Ok(col)) => (row, col),
                    _ => return Err(XlsxError::OutOfBounds(r, c)),
                };
                match value {
                    CellValue::Empty => continue,
                    CellValue::Boolean(b) => worksheet.write_boolean(row, col, *b)?,
                    CellValue::Number(n) => worksheet.write_number(row, col, *n)?,
                    CellValue::String(s) => worksheet.write_string(row, col, s)?,
                    CellValue::Error(e) => worksheet.write_string(row, col, e.as_str())?,
                    CellValue::DateTime(serial) => {
                        let format = if serial.fract() == 0.0 {
                            date_format
                        } else {
                            datetime_format
                        };
                        worksheet.write_number_with_format(row, col, *serial, format)?
                    }
                };
            }
        }
        Ok(())
    }
}
