use serde::Serialize;

use super::fields::FormRecord;
use super::policy::FieldSelection;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// Checks only the fields a step owns; the rest of the record may still be
/// blank at this point of the wizard.
pub fn validate_selected<T: FormRecord>(record: &T, selection: &FieldSelection) -> Vec<FieldViolation> {
    T::field_table()
        .names()
        .filter(|field| selection.contains(field))
        .flat_map(|field| {
            record
                .check_field(field)
                .into_iter()
                .map(move |message| FieldViolation { field, message })
        })
        .collect()
}
