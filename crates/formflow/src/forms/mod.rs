//! Step forms, their field-selection policies and the confirm-stage merge.

pub mod aggregate;
pub mod definition;
pub mod error;
pub mod fields;
pub mod policy;
pub mod records;
pub mod step;
pub mod validation;

#[cfg(test)]
mod tests;

pub use aggregate::{AggregateForm, ConfirmForm, StepForm, StepFormAggregator};
pub use definition::{DefinitionError, FieldOverlap, StepBinding, WizardDefinition};
pub use error::FormFlowError;
pub use fields::{FieldAccessor, FieldError, FieldTable, FormRecord};
pub use policy::{FieldPolicy, FieldSelection};
pub use records::{
    BloodType, CareerForm, EducationEntry, FormKind, JobEntry, Language, Languages, PersonForm,
    Sex,
};
pub use step::{StepId, INPUT_STEP_1, INPUT_STEP_2, INPUT_STEP_3, STEP_COMPLETE, STEP_CONFIRM};
pub use validation::FieldViolation;
