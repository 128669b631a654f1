//! Column to field binding
//!
//! Binding runs once per read call: every header column is matched against
//! the record's tags and given its conversion up front, and the resulting
//! list is reused for every data row.

use log::debug;

use crate::error::{Error, Result};
use crate::options::ReadOptions;
use crate::record::RecordDescriptor;
use crate::unmarshal::{resolve, Coercion};

/// The resolved binding of one input column
pub struct FieldBinding<R> {
    column_index: usize,
    header: String,
    field: Option<(usize, &'static str)>,
    coercion: Option<Coercion<R>>,
}

impl<R> FieldBinding<R> {
    /// Column position (0-based)
    pub fn column_index(&self) -> usize {
        self.column_index
    }

    /// Header text of the column
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Identifier of the destination field, if any
    pub fn field_ident(&self) -> Option<&'static str> {
        self.field.map(|(_, ident)| ident)
    }

    /// Position of the destination field in its descriptor, if any
    pub fn field_index(&self) -> Option<usize> {
        self.field.map(|(index, _)| index)
    }

    /// The conversion for this column; `None` for skipped columns
    pub fn coercion(&self) -> Option<&Coercion<R>> {
        self.coercion.as_ref()
    }
}

impl<R> std::fmt::Debug for FieldBinding<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldBinding")
            .field("column_index", &self.column_index)
            .field("header", &self.header)
            .field("field", &self.field_ident())
            .field("coercion", &self.coercion.as_ref().map(Coercion::name))
            .finish()
    }
}

/// Bind header columns to the fields of a record type
pub fn bind<R>(
    headers: &[String],
    descriptor: &RecordDescriptor<R>,
    options: &ReadOptions<R>,
) -> Result<Vec<FieldBinding<R>>> {
    let tag_map = descriptor.tag_map(&options.tag_name);
    let mut bindings = Vec::with_capacity(headers.len());

    for (column_index, header) in headers.iter().enumerate() {
        let Some(&field_index) = tag_map.get(header.as_str()) else {
            if !options.skip_unknown_columns {
                return Err(Error::NoDestinationField {
                    column: header.clone(),
                    index: column_index,
                });
            }
            bindings.push(FieldBinding {
                column_index,
                header: header.clone(),
                field: None,
                coercion: None,
            });
            continue;
        };

        let field = &descriptor.fields[field_index];
        let coercion = resolve(field);
        if coercion.is_none() && !options.skip_unknown_types {
            return Err(Error::NoUnmarshaler {
                column: header.clone(),
                index: column_index,
            });
        }
        bindings.push(FieldBinding {
            column_index,
            header: header.clone(),
            field: Some((field_index, field.ident)),
            coercion,
        });
    }

    debug!(
        "bound {} of {} columns to {}",
        bindings.iter().filter(|b| b.coercion.is_some()).count(),
        headers.len(),
        descriptor.type_name
    );
    Ok(bindings)
}
