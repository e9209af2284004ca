use serde::Serialize;
use std::collections::HashSet;
use tracing::warn;

use super::fields::FormRecord;
use super::policy::{FieldPolicy, FieldSelection};
use super::records::{CareerForm, FormKind, PersonForm};
use super::step::{StepId, INPUT_STEP_1, INPUT_STEP_2, INPUT_STEP_3};

/// Configuration attached to one input step: the sub-record it edits and the
/// fields it owns.
#[derive(Debug, Clone, Serialize)]
pub struct StepBinding {
    step: StepId,
    kind: FormKind,
    policy: FieldPolicy,
}

impl StepBinding {
    pub fn new(step: impl Into<StepId>, kind: FormKind, policy: FieldPolicy) -> Self {
        Self {
            step: step.into(),
            kind,
            policy,
        }
    }

    pub fn step(&self) -> &StepId {
        &self.step
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn policy(&self) -> &FieldPolicy {
        &self.policy
    }

    pub fn selection(&self) -> FieldSelection {
        match self.kind {
            FormKind::Person => self.policy.resolve(PersonForm::field_table().names()),
            FormKind::Career => self.policy.resolve(CareerForm::field_table().names()),
        }
    }
}

/// Two steps that write the same confirm field; the later merge wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldOverlap {
    pub kind: FormKind,
    pub first: StepId,
    pub second: StepId,
    pub fields: Vec<&'static str>,
}

#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("a wizard needs at least one input step")]
    NoSteps,
    #[error("step `{0}` is declared more than once")]
    DuplicateStep(StepId),
    #[error("step `{0}` is reserved for the confirm flow")]
    ReservedStep(StepId),
}

/// Ordered input steps of a wizard, followed by `confirm` and `complete`.
#[derive(Debug, Clone)]
pub struct WizardDefinition {
    bindings: Vec<StepBinding>,
}

impl WizardDefinition {
    pub fn new(bindings: Vec<StepBinding>) -> Result<Self, DefinitionError> {
        if bindings.is_empty() {
            return Err(DefinitionError::NoSteps);
        }

        let mut seen = HashSet::new();
        for binding in &bindings {
            if binding.step.is_reserved() {
                return Err(DefinitionError::ReservedStep(binding.step.clone()));
            }
            if !seen.insert(&binding.step) {
                return Err(DefinitionError::DuplicateStep(binding.step.clone()));
            }
        }

        let definition = Self { bindings };
        for overlap in definition.overlapping_fields() {
            warn!(
                first = %overlap.first,
                second = %overlap.second,
                fields = ?overlap.fields,
                "steps share confirm fields; the later merge overwrites the earlier one"
            );
        }
        Ok(definition)
    }

    /// The three-page person/career wizard: basic person data, then
    /// language and memo, then education and job history.
    pub fn splitted_input() -> Self {
        Self {
            bindings: vec![
                StepBinding::new(
                    INPUT_STEP_1,
                    FormKind::Person,
                    FieldPolicy::exclude(["language", "memo"]),
                ),
                StepBinding::new(
                    INPUT_STEP_2,
                    FormKind::Person,
                    FieldPolicy::include(["language", "memo"]),
                ),
                StepBinding::new(INPUT_STEP_3, FormKind::Career, FieldPolicy::all()),
            ],
        }
    }

    pub fn bindings(&self) -> &[StepBinding] {
        &self.bindings
    }

    pub fn binding(&self, step: &StepId) -> Option<&StepBinding> {
        self.bindings.iter().find(|binding| &binding.step == step)
    }

    pub fn first_step(&self) -> &StepId {
        &self.bindings[0].step
    }

    /// Input steps followed by `confirm` and `complete`.
    pub fn steps(&self) -> Vec<StepId> {
        self.bindings
            .iter()
            .map(|binding| binding.step.clone())
            .chain([StepId::confirm(), StepId::complete()])
            .collect()
    }

    pub fn next_step(&self, step: &StepId) -> Option<StepId> {
        let steps = self.steps();
        let position = steps.iter().position(|candidate| candidate == step)?;
        steps.get(position + 1).cloned()
    }

    pub fn previous_step(&self, step: &StepId) -> Option<StepId> {
        let steps = self.steps();
        let position = steps.iter().position(|candidate| candidate == step)?;
        position.checked_sub(1).and_then(|index| steps.get(index).cloned())
    }

    pub fn overlapping_fields(&self) -> Vec<FieldOverlap> {
        let mut overlaps = Vec::new();
        for (index, first) in self.bindings.iter().enumerate() {
            let first_selection = first.selection();
            for second in self.bindings.iter().skip(index + 1) {
                if first.kind != second.kind {
                    continue;
                }
                let fields = first_selection.intersection(&second.selection());
                if !fields.is_empty() {
                    overlaps.push(FieldOverlap {
                        kind: first.kind,
                        first: first.step.clone(),
                        second: second.step.clone(),
                        fields,
                    });
                }
            }
        }
        overlaps
    }
}

impl Default for WizardDefinition {
    fn default() -> Self {
        Self::splitted_input()
    }
}
