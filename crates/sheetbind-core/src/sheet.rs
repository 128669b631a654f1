//! In-memory sheets and workbooks
//!
//! A [`Sheet`] is a dense grid of [`CellValue`]s as materialized by a file
//! reader, or as built by record emission before handing it to a writer.

use crate::cell::CellValue;
use crate::error::{Error, Result};

/// Maximum sheet name length
pub const MAX_SHEET_NAME_LEN: usize = 31;

const INVALID_SHEET_NAME_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];

static EMPTY_CELL: CellValue = CellValue::Empty;

/// A single sheet of rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    /// Sheet name
    name: String,
    /// Rows, each possibly shorter than the widest row
    rows: Vec<Vec<CellValue>>,
    /// Width of the widest row
    column_count: usize,
}

impl Sheet {
    /// Create an empty sheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
            column_count: 0,
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows, including any header rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Get the cells of a row
    pub fn row(&self, index: usize) -> Option<&[CellValue]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Iterate over all rows in order
    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Get a cell; cells outside the grid read as empty
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Append a row after the last one
    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.column_count = self.column_count.max(row.len());
        self.rows.push(row);
    }

    /// Set a cell value, growing the grid as needed
    pub fn set_cell_value<V: Into<CellValue>>(&mut self, row: usize, col: usize, value: V) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize(col + 1, CellValue::Empty);
        }
        cells[col] = value.into();
        self.column_count = self.column_count.max(col + 1);
    }

    /// Text of every cell in a row, padded to the sheet width
    pub fn row_texts(&self, index: usize) -> Vec<String> {
        (0..self.column_count)
            .map(|col| self.cell(index, col).raw_text().into_owned())
            .collect()
    }
}

/// An ordered collection of sheets plus the workbook date system
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<Sheet>,
    date1904: bool,
}

impl Workbook {
    /// Create a workbook with no sheets
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether serial dates count from 1904-01-01
    pub fn is_date1904(&self) -> bool {
        self.date1904
    }

    /// Set the date system
    pub fn set_date1904(&mut self, date1904: bool) {
        self.date1904 = date1904;
    }

    /// Number of sheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Get a sheet by index
    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    /// Get a mutable sheet by index
    pub fn sheet_mut(&mut self, index: usize) -> Option<&mut Sheet> {
        self.sheets.get_mut(index)
    }

    /// Get a sheet by exact name
    pub fn sheet_by_name(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Find a sheet index by exact name
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.sheets.iter().position(|s| s.name == name)
    }

    /// All sheets in order
    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Add a sheet, returning its index
    pub fn add_sheet(&mut self, sheet: Sheet) -> Result<usize> {
        self.validate_sheet_name(&sheet.name)?;
        self.sheets.push(sheet);
        Ok(self.sheets.len() - 1)
    }

    /// Get a sheet by name, adding an empty one if missing
    ///
    /// Names match case-insensitively, like the duplicate check in
    /// [`Workbook::add_sheet`].
    pub fn sheet_or_insert(&mut self, name: &str) -> Result<&mut Sheet> {
        let name_lower = name.to_lowercase();
        let existing = self
            .sheets
            .iter()
            .position(|s| s.name.to_lowercase() == name_lower);
        let index = match existing {
            Some(index) => index,
            None => self.add_sheet(Sheet::new(name))?,
        };
        Ok(&mut self.sheets[index])
    }

    fn validate_sheet_name(&self, name: &str) -> Result<()> {
        validate_sheet_name(name)?;

        // Duplicate names are compared case-insensitively
        let name_lower = name.to_lowercase();
        if self
            .sheets
            .iter()
            .any(|s| s.name.to_lowercase() == name_lower)
        {
            return Err(Error::DuplicateSheetName(name.to_string()));
        }
        Ok(())
    }
}

/// Check a sheet name against Excel's rules
pub fn validate_sheet_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(Error::InvalidSheetName(format!(
            "Sheet name too long (max {} characters)",
            MAX_SHEET_NAME_LEN
        )));
    }
    for c in INVALID_SHEET_NAME_CHARS {
        if name.contains(*c) {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name cannot contain '{}'",
                c
            )));
        }
    }
    Ok(())
}

/// Replace invalid characters and trim to a valid sheet name
pub fn sanitize_sheet_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if INVALID_SHEET_NAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();
    let trimmed = replaced.trim();
    if trimmed.is_empty() {
        return "Sheet".to_string();
    }
    trimmed.chars().take(MAX_SHEET_NAME_LEN).collect()
}
