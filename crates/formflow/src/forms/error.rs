use super::fields::FieldError;
use super::records::FormKind;
use super::step::StepId;

#[derive(Debug, thiserror::Error)]
pub enum FormFlowError {
    #[error("step `{step}` expects a {expected} form but received a {found} form")]
    StepFormMismatch {
        step: StepId,
        expected: FormKind,
        found: FormKind,
    },
    #[error("step `{0}` is not declared by this wizard")]
    UnknownStep(StepId),
    #[error(transparent)]
    Field(#[from] FieldError),
}
