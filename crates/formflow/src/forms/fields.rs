//! Explicit field-mapping tables.
//!
//! Each form record lists its fields once through [`field_table!`]; the
//! resulting table carries a reader, a writer and a copier per field so that
//! "copy these fields by name" never needs runtime reflection.

use serde_json::{Map, Value};
use std::fmt;

use super::policy::FieldSelection;
use super::records::FormKind;

#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error("field `{field}` rejected the submitted value: {source}")]
    InvalidValue {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("field `{field}` could not be read: {source}")]
    Unreadable {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Getter/setter pair for one named field of `T`.
pub struct FieldAccessor<T> {
    name: &'static str,
    read: fn(&T) -> serde_json::Result<Value>,
    write: fn(&mut T, Value) -> serde_json::Result<()>,
    copy: fn(&T, &mut T),
}

impl<T> FieldAccessor<T> {
    pub fn new(
        name: &'static str,
        read: fn(&T) -> serde_json::Result<Value>,
        write: fn(&mut T, Value) -> serde_json::Result<()>,
        copy: fn(&T, &mut T),
    ) -> Self {
        Self {
            name,
            read,
            write,
            copy,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn read(&self, record: &T) -> Result<Value, FieldError> {
        (self.read)(record).map_err(|source| FieldError::Unreadable {
            field: self.name,
            source,
        })
    }

    pub fn write(&self, record: &mut T, value: Value) -> Result<(), FieldError> {
        (self.write)(record, value).map_err(|source| FieldError::InvalidValue {
            field: self.name,
            source,
        })
    }

    pub fn copy(&self, source: &T, target: &mut T) {
        (self.copy)(source, target)
    }
}

impl<T> fmt::Debug for FieldAccessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldAccessor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Ordered accessor list for one record type.
#[derive(Debug)]
pub struct FieldTable<T> {
    accessors: Vec<FieldAccessor<T>>,
}

impl<T> FieldTable<T> {
    pub fn new(accessors: Vec<FieldAccessor<T>>) -> Self {
        Self { accessors }
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.accessors.iter().map(FieldAccessor::name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldAccessor<T>> {
        self.accessors.iter().find(|accessor| accessor.name == name)
    }

    fn selected<'a>(
        &'a self,
        selection: &'a FieldSelection,
    ) -> impl Iterator<Item = &'a FieldAccessor<T>> + 'a {
        self.accessors
            .iter()
            .filter(move |accessor| selection.contains(accessor.name))
    }

    /// Copies the selected fields from `source` into `target`, returning the
    /// names that were written. Unselected target fields are left as they are.
    pub fn copy_selected(
        &self,
        selection: &FieldSelection,
        source: &T,
        target: &mut T,
    ) -> Vec<&'static str> {
        self.selected(selection)
            .map(|accessor| {
                accessor.copy(source, target);
                accessor.name
            })
            .collect()
    }

    /// Writes request values into `record` by field name.
    ///
    /// Only selected fields are touched and unknown names are skipped. On
    /// error the record may be partially written, so callers populate a copy.
    pub fn populate(
        &self,
        selection: &FieldSelection,
        record: &mut T,
        input: &Map<String, Value>,
    ) -> Result<Vec<&'static str>, FieldError> {
        let mut written = Vec::new();
        for accessor in self.selected(selection) {
            if let Some(value) = input.get(accessor.name) {
                accessor.write(record, value.clone())?;
                written.push(accessor.name);
            }
        }
        Ok(written)
    }

    /// Reads the selected fields into a JSON object for rendering.
    pub fn snapshot(
        &self,
        selection: &FieldSelection,
        record: &T,
    ) -> Result<Map<String, Value>, FieldError> {
        self.selected(selection)
            .map(|accessor| Ok((accessor.name.to_string(), accessor.read(record)?)))
            .collect()
    }
}

/// A form sub-record that can be bound to wizard steps.
pub trait FormRecord: Clone + Default + fmt::Debug + Send + Sync + 'static {
    const KIND: FormKind;

    fn field_table() -> &'static FieldTable<Self>;

    /// Problems with the current value of `field`; empty when it is valid.
    fn check_field(&self, _field: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Builds a [`FieldTable`] from struct field identifiers; the field name used
/// on the wire is the identifier itself.
macro_rules! field_table {
    ($record:ty { $($field:ident),+ $(,)? }) => {
        $crate::forms::fields::FieldTable::new(vec![
            $(
                $crate::forms::fields::FieldAccessor::<$record>::new(
                    stringify!($field),
                    |record: &$record| -> serde_json::Result<serde_json::Value> {
                        serde_json::to_value(&record.$field)
                    },
                    |record: &mut $record, value: serde_json::Value| -> serde_json::Result<()> {
                        record.$field = serde_json::from_value(value)?;
                        Ok(())
                    },
                    |source: &$record, target: &mut $record| {
                        target.$field = source.$field.clone();
                    },
                ),
            )+
        ])
    };
}

pub(crate) use field_table;
