use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::session::{SessionId, SessionStoreError, WizardSession, WizardSessionStore};
use crate::forms::{
    CareerForm, ConfirmForm, EducationEntry, FieldError, FieldPolicy, FieldViolation,
    FormFlowError, FormKind, PersonForm, StepFormAggregator, StepId, WizardDefinition,
};

const INPUT_COMMENT_FIELD: &str = "input_comment";

const SESSION_ID_PREFIX: &str = "wiz-";

/// Random v4 ids; two sessions share nothing but the prefix.
fn next_session_id() -> SessionId {
    SessionId(format!("{SESSION_ID_PREFIX}{}", Uuid::new_v4().simple()))
}

/// Existing records loaded into an edit session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Prefill {
    pub person: PersonForm,
    pub career: CareerForm,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StartRequest {
    pub prefill: Option<Prefill>,
    pub input_comment: Option<String>,
}

/// What a renderer needs to draw one input step.
#[derive(Debug, Clone, Serialize)]
pub struct StepView {
    pub session_id: SessionId,
    pub step: StepId,
    pub form: FormKind,
    pub policy: FieldPolicy,
    pub fields: Vec<&'static str>,
    pub values: Map<String, Value>,
    pub previous_step: Option<StepId>,
    pub next_step: Option<StepId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education_template: Option<EducationEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_comment: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfirmView {
    pub session_id: SessionId,
    pub confirm: ConfirmForm,
    pub missing_steps: Vec<StepId>,
}

/// Drives wizard sessions: start, render and submit steps, confirm, finish.
pub struct WizardService<S> {
    store: Arc<S>,
    definition: Arc<WizardDefinition>,
}

impl<S> WizardService<S>
where
    S: WizardSessionStore + 'static,
{
    pub fn new(store: Arc<S>, definition: WizardDefinition) -> Self {
        Self {
            store,
            definition: Arc::new(definition),
        }
    }

    pub fn definition(&self) -> &WizardDefinition {
        &self.definition
    }

    pub fn start(&self, request: StartRequest) -> Result<WizardSession, WizardServiceError> {
        let mut aggregator = StepFormAggregator::new(self.definition.clone());
        if let Some(prefill) = &request.prefill {
            aggregator
                .aggregate_mut()
                .prefill(&prefill.person, &prefill.career);
        }
        aggregator
            .aggregate_mut()
            .set_input_comment(request.input_comment);

        let now = Utc::now();
        let session = WizardSession {
            id: next_session_id(),
            current_step: self.definition.first_step().clone(),
            submitted_steps: BTreeSet::new(),
            aggregator,
            started_at: now,
            updated_at: now,
        };

        let stored = self.store.insert(session)?;
        info!(session = %stored.id, prefilled = request.prefill.is_some(), "wizard session started");
        Ok(stored)
    }

    pub fn get(&self, id: &SessionId) -> Result<WizardSession, WizardServiceError> {
        let session = self.store.fetch(id)?.ok_or(SessionStoreError::NotFound)?;
        Ok(session)
    }

    pub fn step_view(&self, id: &SessionId, step: &StepId) -> Result<StepView, WizardServiceError> {
        let session = self.get(id)?;
        let binding = self
            .definition
            .binding(step)
            .ok_or_else(|| WizardServiceError::UnknownStep(step.clone()))?;
        let selection = binding.selection();
        let form = session
            .aggregator
            .aggregate()
            .step_form(step)
            .ok_or_else(|| WizardServiceError::UnknownStep(step.clone()))?;

        let education_template = match binding.kind() {
            FormKind::Career if selection.contains("educations") => {
                Some(EducationEntry::template())
            }
            _ => None,
        };

        Ok(StepView {
            session_id: session.id.clone(),
            step: step.clone(),
            form: binding.kind(),
            policy: binding.policy().clone(),
            fields: selection.iter().collect(),
            values: form.snapshot(&selection)?,
            previous_step: self.definition.previous_step(step),
            next_step: self.definition.next_step(step),
            education_template,
            input_comment: session
                .aggregator
                .aggregate()
                .input_comment()
                .map(str::to_string),
        })
    }

    /// Applies request values to the step's form, validates the fields the
    /// step owns and merges them into the confirm form.
    ///
    /// Any declared input step may be submitted again; the session then moves
    /// on to the step after it.
    pub fn submit(
        &self,
        id: &SessionId,
        step: &StepId,
        input: &Map<String, Value>,
    ) -> Result<WizardSession, WizardServiceError> {
        let mut session = self.get(id)?;
        let binding = self
            .definition
            .binding(step)
            .ok_or_else(|| WizardServiceError::UnknownStep(step.clone()))?;
        let selection = binding.selection();

        let mut form = session
            .aggregator
            .aggregate()
            .step_form(step)
            .cloned()
            .ok_or_else(|| WizardServiceError::UnknownStep(step.clone()))?;
        let written = form.populate(&selection, input)?;

        let violations = form.validate(&selection);
        if !violations.is_empty() {
            debug!(session = %id, %step, count = violations.len(), "step submission rejected");
            return Err(WizardServiceError::Validation(violations));
        }

        session.aggregator.submit_step(step, form)?;
        if let Some(Value::String(comment)) = input.get(INPUT_COMMENT_FIELD) {
            session
                .aggregator
                .aggregate_mut()
                .set_input_comment(Some(comment.clone()));
        }

        session.submitted_steps.insert(step.clone());
        if let Some(next) = self.definition.next_step(step) {
            session.current_step = next;
        }
        session.updated_at = Utc::now();

        self.store.update(session.clone())?;
        info!(session = %id, %step, fields = ?written, "step submitted");
        Ok(session)
    }

    pub fn confirm(&self, id: &SessionId) -> Result<ConfirmView, WizardServiceError> {
        let session = self.get(id)?;
        Ok(ConfirmView {
            session_id: session.id.clone(),
            confirm: session.aggregator.merged_result().clone(),
            missing_steps: session.missing_steps(),
        })
    }

    /// Finishes the wizard, handing back the merged record and discarding the
    /// session. Every input step must have been submitted.
    pub fn complete(&self, id: &SessionId) -> Result<ConfirmForm, WizardServiceError> {
        let session = self.get(id)?;
        let missing = session.missing_steps();
        if !missing.is_empty() {
            return Err(WizardServiceError::Incomplete(missing));
        }

        let session = self.store.remove(id)?.ok_or(SessionStoreError::NotFound)?;
        info!(session = %id, "wizard completed");
        Ok(session.aggregator.into_merged())
    }

    pub fn abandon(&self, id: &SessionId) -> Result<(), WizardServiceError> {
        self.store.remove(id)?.ok_or(SessionStoreError::NotFound)?;
        info!(session = %id, "wizard abandoned");
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WizardServiceError {
    #[error("step `{0}` is not an input step of this wizard")]
    UnknownStep(StepId),
    #[error("submitted values failed validation ({} problem(s))", .0.len())]
    Validation(Vec<FieldViolation>),
    #[error("wizard still needs input for: {}", join_steps(.0))]
    Incomplete(Vec<StepId>),
    #[error(transparent)]
    Form(#[from] FormFlowError),
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error(transparent)]
    Store(#[from] SessionStoreError),
}

fn join_steps(steps: &[StepId]) -> String {
    steps
        .iter()
        .map(StepId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
