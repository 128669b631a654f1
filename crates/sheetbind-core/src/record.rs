//! Record descriptors
//!
//! A [`RecordDescriptor`] is the schema of a record type: its fields in
//! declaration order, each with its tags and the conversions it supports.
//! It is built once per type (the derive caches it in a `OnceLock`) so no
//! per-row introspection happens.

use std::collections::HashMap;

use crate::cell::CellValue;
use crate::error::CoerceError;
use crate::value::{CoerceParams, ScalarKind};

/// Tag value that excludes a field from both reading and writing
pub const SKIP_TAG: &str = "-";

/// Writes a coerced cell into one field of a record
pub type CellSetter<R> = fn(&mut R, &CellValue, &CoerceParams) -> Result<(), CoerceError>;

/// Writes raw cell text into one field of a record
pub type TextSetter<R> = fn(&mut R, &str) -> Result<(), CoerceError>;

/// Reads one field of a record as a cell
pub type CellGetter<R> = fn(&R) -> CellValue;

/// A type that can be read from and written to sheets as rows
pub trait Record: Default + 'static {
    /// The cached schema of this type
    fn descriptor() -> &'static RecordDescriptor<Self>;
}

/// Built-in coercion for a primitive (or optional primitive) field
pub struct Primitive<R> {
    /// Kind requested from the coercion dispatcher
    pub kind: ScalarKind,
    /// The field is an `Option` of the kind
    pub pointer: bool,
    pub set: CellSetter<R>,
}

impl<R> Clone for Primitive<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Primitive<R> {}

/// One declared field of a record type
pub struct FieldDescriptor<R> {
    /// Field identifier as declared
    pub ident: &'static str,
    /// `(tag name, tag value)` pairs
    pub tags: &'static [(&'static str, &'static str)],
    /// Field type implements `UnmarshalCell`
    pub cell_unmarshaler: Option<CellSetter<R>>,
    /// Field type is a date/time
    pub datetime: Option<CellSetter<R>>,
    /// Field type implements `FromStr`
    pub text_unmarshaler: Option<TextSetter<R>>,
    pub primitive: Option<Primitive<R>>,
    /// Conversion used when emitting; `None` writes an empty cell
    pub marshal: Option<CellGetter<R>>,
}

impl<R> FieldDescriptor<R> {
    /// A field with no tags and no conversions
    pub fn new(ident: &'static str) -> Self {
        Self {
            ident,
            tags: &[],
            cell_unmarshaler: None,
            datetime: None,
            text_unmarshaler: None,
            primitive: None,
            marshal: None,
        }
    }

    pub fn tags(mut self, tags: &'static [(&'static str, &'static str)]) -> Self {
        self.tags = tags;
        self
    }

    pub fn cell_unmarshaler(mut self, set: CellSetter<R>) -> Self {
        self.cell_unmarshaler = Some(set);
        self
    }

    pub fn datetime(mut self, set: CellSetter<R>) -> Self {
        self.datetime = Some(set);
        self
    }

    pub fn text_unmarshaler(mut self, set: TextSetter<R>) -> Self {
        self.text_unmarshaler = Some(set);
        self
    }

    pub fn primitive(mut self, kind: ScalarKind, pointer: bool, set: CellSetter<R>) -> Self {
        self.primitive = Some(Primitive { kind, pointer, set });
        self
    }

    pub fn marshal(mut self, get: CellGetter<R>) -> Self {
        self.marshal = Some(get);
        self
    }

    /// Value of the given tag, if the field carries it
    pub fn tag(&self, name: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }

    /// Whether the field is excluded under the given tag
    pub fn is_skipped(&self, tag_name: &str) -> bool {
        self.tag(tag_name) == Some(SKIP_TAG)
    }
}

/// Schema of a record type
pub struct RecordDescriptor<R> {
    /// Type name, for diagnostics
    pub type_name: &'static str,
    /// Fields in declaration order
    pub fields: Vec<FieldDescriptor<R>>,
}

impl<R> RecordDescriptor<R> {
    pub fn new(type_name: &'static str, fields: Vec<FieldDescriptor<R>>) -> Self {
        Self { type_name, fields }
    }

    /// Map from tag value to field position
    ///
    /// When two fields share a tag value the later one wins. Skipped fields
    /// are left out.
    pub fn tag_map(&self, tag_name: &str) -> HashMap<&'static str, usize> {
        self.fields
            .iter()
            .enumerate()
            .filter_map(|(i, field)| match field.tag(tag_name) {
                Some(value) if value != SKIP_TAG => Some((value, i)),
                _ => None,
            })
            .collect()
    }

    /// Get a field by position
    pub fn field(&self, index: usize) -> Option<&FieldDescriptor<R>> {
        self.fields.get(index)
    }
}
