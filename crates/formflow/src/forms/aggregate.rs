use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use super::definition::{StepBinding, WizardDefinition};
use super::error::FormFlowError;
use super::fields::{FieldError, FormRecord};
use super::policy::FieldSelection;
use super::records::{CareerForm, FormKind, PersonForm};
use super::step::StepId;
use super::validation::{validate_selected, FieldViolation};

/// The data a single step edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "form", content = "data", rename_all = "snake_case")]
pub enum StepForm {
    Person(PersonForm),
    Career(CareerForm),
}

impl StepForm {
    pub fn empty(kind: FormKind) -> Self {
        match kind {
            FormKind::Person => Self::Person(PersonForm::default()),
            FormKind::Career => Self::Career(CareerForm::default()),
        }
    }

    pub fn kind(&self) -> FormKind {
        match self {
            Self::Person(_) => PersonForm::KIND,
            Self::Career(_) => CareerForm::KIND,
        }
    }

    pub fn populate(
        &mut self,
        selection: &FieldSelection,
        input: &Map<String, Value>,
    ) -> Result<Vec<&'static str>, FieldError> {
        match self {
            Self::Person(form) => PersonForm::field_table().populate(selection, form, input),
            Self::Career(form) => CareerForm::field_table().populate(selection, form, input),
        }
    }

    pub fn snapshot(&self, selection: &FieldSelection) -> Result<Map<String, Value>, FieldError> {
        match self {
            Self::Person(form) => PersonForm::field_table().snapshot(selection, form),
            Self::Career(form) => CareerForm::field_table().snapshot(selection, form),
        }
    }

    pub fn validate(&self, selection: &FieldSelection) -> Vec<FieldViolation> {
        match self {
            Self::Person(form) => validate_selected(form, selection),
            Self::Career(form) => validate_selected(form, selection),
        }
    }
}

impl From<PersonForm> for StepForm {
    fn from(value: PersonForm) -> Self {
        Self::Person(value)
    }
}

impl From<CareerForm> for StepForm {
    fn from(value: CareerForm) -> Self {
        Self::Career(value)
    }
}

/// The merged record shown on the confirm and complete steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmForm {
    pub person: PersonForm,
    pub career: CareerForm,
}

/// Everything one wizard session has entered so far.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateForm {
    step_forms: BTreeMap<StepId, StepForm>,
    confirm: ConfirmForm,
    editing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    input_comment: Option<String>,
}

impl AggregateForm {
    pub fn new(definition: &WizardDefinition) -> Self {
        let step_forms = definition
            .bindings()
            .iter()
            .map(|binding| (binding.step().clone(), StepForm::empty(binding.kind())))
            .collect();

        Self {
            step_forms,
            confirm: ConfirmForm::default(),
            editing: false,
            input_comment: None,
        }
    }

    pub fn step_form(&self, step: &StepId) -> Option<&StepForm> {
        self.step_forms.get(step)
    }

    pub fn confirm(&self) -> &ConfirmForm {
        &self.confirm
    }

    /// True once the form was prefilled from stored records.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Free-text note that is only shown while editing stored records; a
    /// fresh entry session keeps it hidden.
    pub fn input_comment(&self) -> Option<&str> {
        self.input_comment.as_deref().filter(|_| self.editing)
    }

    pub fn set_input_comment(&mut self, comment: Option<String>) {
        self.input_comment = comment.filter(|comment| !comment.trim().is_empty());
    }

    /// Loads existing records into every step form so an edit session starts
    /// from stored values. The confirm form is only filled by merges.
    pub fn prefill(&mut self, person: &PersonForm, career: &CareerForm) {
        for form in self.step_forms.values_mut() {
            *form = match form.kind() {
                FormKind::Person => StepForm::Person(person.clone()),
                FormKind::Career => StepForm::Career(career.clone()),
            };
        }
        self.editing = true;
    }
}

/// Merges submitted step forms into the session's confirm form.
#[derive(Debug, Clone)]
pub struct StepFormAggregator {
    definition: Arc<WizardDefinition>,
    aggregate: AggregateForm,
}

impl StepFormAggregator {
    pub fn new(definition: Arc<WizardDefinition>) -> Self {
        let aggregate = AggregateForm::new(&definition);
        Self {
            definition,
            aggregate,
        }
    }

    pub fn definition(&self) -> &WizardDefinition {
        &self.definition
    }

    pub fn aggregate(&self) -> &AggregateForm {
        &self.aggregate
    }

    pub fn aggregate_mut(&mut self) -> &mut AggregateForm {
        &mut self.aggregate
    }

    /// Copies the fields `step` owns from `submitted` into the confirm form.
    ///
    /// An undeclared step leaves the confirm form untouched and only logs a
    /// warning.
    pub fn merge_step(&mut self, step: &StepId, submitted: &StepForm) -> Result<(), FormFlowError> {
        let Some(binding) = self.definition.binding(step) else {
            warn!(%step, "merge requested for undeclared step; confirm form unchanged");
            return Ok(());
        };
        ensure_kind(binding, submitted)?;

        let selection = binding.selection();
        let confirm = &mut self.aggregate.confirm;
        let written = match submitted {
            StepForm::Person(form) => {
                PersonForm::field_table().copy_selected(&selection, form, &mut confirm.person)
            }
            StepForm::Career(form) => {
                CareerForm::field_table().copy_selected(&selection, form, &mut confirm.career)
            }
        };

        debug!(%step, fields = ?written, "merged step into confirm form");
        Ok(())
    }

    /// Stores `submitted` as the step's own form and merges it.
    pub fn submit_step(&mut self, step: &StepId, submitted: StepForm) -> Result<(), FormFlowError> {
        let binding = self
            .definition
            .binding(step)
            .ok_or_else(|| FormFlowError::UnknownStep(step.clone()))?;
        ensure_kind(binding, &submitted)?;

        self.merge_step(step, &submitted)?;
        self.aggregate.step_forms.insert(step.clone(), submitted);
        Ok(())
    }

    pub fn merged_result(&self) -> &ConfirmForm {
        &self.aggregate.confirm
    }

    pub fn into_merged(self) -> ConfirmForm {
        self.aggregate.confirm
    }
}

fn ensure_kind(binding: &StepBinding, submitted: &StepForm) -> Result<(), FormFlowError> {
    if binding.kind() == submitted.kind() {
        Ok(())
    } else {
        Err(FormFlowError::StepFormMismatch {
            step: binding.step().clone(),
            expected: binding.kind(),
            found: submitted.kind(),
        })
    }
}
