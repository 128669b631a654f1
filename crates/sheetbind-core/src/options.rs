//! Read and write options

use std::fmt;

use crate::binder::FieldBinding;
use crate::cell::CellValue;
use crate::error::CoerceError;
use crate::value::CoerceParams;

/// Called instead of the configured policy when a cell fails to coerce
///
/// The record is the one being built for the current row and may be mutated,
/// e.g. to store a fallback value for the field.
pub type RowErrorHandler<R> = Box<dyn Fn(&CellValue, &mut R, &FieldBinding<R>, &CoerceError)>;

/// Called for every cell of a column that is bound to no coercion
///
/// The record may be mutated, e.g. to stash extra columns.
pub type UnusedColumnHandler<R> = Box<dyn Fn(&CellValue, &mut R, &FieldBinding<R>)>;

/// What to do when a cell fails to coerce into its field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorHandling {
    /// Leave the field at its default and carry on
    Ignore,
    /// Fail the whole read on the first error
    #[default]
    Abort,
    /// Keep reading and report every error at the end
    Collect,
}

/// Options for reading records from a sheet
pub struct ReadOptions<R> {
    /// Tag key matched against header text (default: "excel")
    pub tag_name: String,
    /// Sheet to read by name; takes precedence over `sheet_index`
    pub sheet_name: Option<String>,
    /// Sheet to read by position (default: 0)
    pub sheet_index: usize,
    /// Row holding the column headers (default: 0)
    pub header_row_index: usize,
    /// First row holding data (default: 1)
    pub data_start_row_index: usize,
    /// Trim whitespace from string fields
    pub trim_space: bool,
    /// chrono formats tried in order for non-native date cells
    pub fallback_date_formats: Vec<String>,
    /// Leave `Option` fields `None` for empty cells instead of coercing them
    pub empty_as_none: bool,
    /// Ignore header columns with no matching field (default: true)
    pub skip_unknown_columns: bool,
    /// Ignore matched fields whose type has no coercion
    pub skip_unknown_types: bool,
    /// Policy for cell coercion errors (default: abort)
    pub error_handling: ErrorHandling,
    /// Collect-mode limit, 0 for unlimited (default: 10)
    pub max_unmarshal_errors: usize,
    /// Per-error callback; takes precedence over abort and collect
    pub row_error_handler: Option<RowErrorHandler<R>>,
    /// Per-cell callback for columns bound to no coercion
    pub unused_column_handler: Option<UnusedColumnHandler<R>>,
}

impl<R> ReadOptions<R> {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the row error callback
    pub fn on_row_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(&CellValue, &mut R, &FieldBinding<R>, &CoerceError) + 'static,
    {
        self.row_error_handler = Some(Box::new(handler));
        self
    }

    /// Set the unused column callback
    pub fn on_unused_column<F>(mut self, handler: F) -> Self
    where
        F: Fn(&CellValue, &mut R, &FieldBinding<R>) + 'static,
    {
        self.unused_column_handler = Some(Box::new(handler));
        self
    }

    /// Coercion parameters for a workbook with the given date system
    pub fn coerce_params(&self, date1904: bool) -> CoerceParams {
        CoerceParams {
            trim_space: self.trim_space,
            date1904,
            fallback_date_formats: self.fallback_date_formats.clone(),
            empty_as_none: self.empty_as_none,
        }
    }
}

impl<R> Default for ReadOptions<R> {
    fn default() -> Self {
        Self {
            tag_name: "excel".to_string(),
            sheet_name: None,
            sheet_index: 0,
            header_row_index: 0,
            data_start_row_index: 1,
            trim_space: false,
            fallback_date_formats: Vec::new(),
            empty_as_none: false,
            skip_unknown_columns: true,
            skip_unknown_types: false,
            error_handling: ErrorHandling::Abort,
            max_unmarshal_errors: 10,
            row_error_handler: None,
            unused_column_handler: None,
        }
    }
}

impl<R> fmt::Debug for ReadOptions<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOptions")
            .field("tag_name", &self.tag_name)
            .field("sheet_name", &self.sheet_name)
            .field("sheet_index", &self.sheet_index)
            .field("header_row_index", &self.header_row_index)
            .field("data_start_row_index", &self.data_start_row_index)
            .field("trim_space", &self.trim_space)
            .field("fallback_date_formats", &self.fallback_date_formats)
            .field("empty_as_none", &self.empty_as_none)
            .field("skip_unknown_columns", &self.skip_unknown_columns)
            .field("skip_unknown_types", &self.skip_unknown_types)
            .field("error_handling", &self.error_handling)
            .field("max_unmarshal_errors", &self.max_unmarshal_errors)
            .field("row_error_handler", &self.row_error_handler.is_some())
            .field("unused_column_handler", &self.unused_column_handler.is_some())
            .finish()
    }
}

/// Options for writing records to a sheet
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Name of the sheet to write (default: "Sheet1")
    pub sheet_name: String,
    /// Tag key whose value becomes the header (default: "excel")
    pub tag_name: String,
    /// Leave out fields without the tag entirely
    pub ignore_fields_without_tag: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            sheet_name: "Sheet1".to_string(),
            tag_name: "excel".to_string(),
            ignore_fields_without_tag: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_defaults() {
        let options = ReadOptions::<()>::default();
        assert_eq!(options.tag_name, "excel");
        assert_eq!(options.data_start_row_index, 1);
        assert!(options.skip_unknown_columns);
        assert!(!options.skip_unknown_types);
        assert_eq!(options.error_handling, ErrorHandling::Abort);
        assert_eq!(options.max_unmarshal_errors, 10);
        assert!(!options.empty_as_none);
    }

    #[test]
    fn test_coerce_params_carry_date_system() {
        let options = ReadOptions::<()> {
            trim_space: true,
            fallback_date_formats: vec!["%d/%m/%Y".into()],
            empty_as_none: true,
            ..Default::default()
        };
        let params = options.coerce_params(true);
        assert!(params.trim_space);
        assert!(params.empty_as_none);
        assert!(params.date1904);
        assert_eq!(params.fallback_date_formats, vec!["%d/%m/%Y".to_string()]);
    }

    #[test]
    fn test_write_defaults() {
        let options = WriteOptions::default();
        assert_eq!(options.sheet_name, "Sheet1");
        assert_eq!(options.tag_name, "excel");
        assert!(!options.ignore_fields_without_tag);
    }
}
