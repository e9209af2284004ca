use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use crate::forms::{StepFormAggregator, StepId};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One user's pass through the wizard. Dropped on complete or abandon.
#[derive(Debug, Clone)]
pub struct WizardSession {
    pub id: SessionId,
    pub current_step: StepId,
    pub submitted_steps: BTreeSet<StepId>,
    pub aggregator: StepFormAggregator,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WizardSession {
    /// Input steps that have not been submitted yet, in wizard order.
    pub fn missing_steps(&self) -> Vec<StepId> {
        self.aggregator
            .definition()
            .bindings()
            .iter()
            .map(|binding| binding.step())
            .filter(|step| !self.submitted_steps.contains(*step))
            .cloned()
            .collect()
    }

    /// True once the session has been idle for longer than `ttl`.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.updated_at)
            .to_std()
            .is_ok_and(|idle| idle > ttl)
    }

    pub fn status_view(&self) -> SessionView {
        SessionView {
            session_id: self.id.clone(),
            current_step: self.current_step.clone(),
            steps: self.aggregator.definition().steps(),
            submitted_steps: self.submitted_steps.iter().cloned().collect(),
            input_comment: self
                .aggregator
                .aggregate()
                .input_comment()
                .map(str::to_string),
            started_at: self.started_at,
            updated_at: self.updated_at,
        }
    }
}

/// Public shape of a session for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub current_step: StepId,
    pub steps: Vec<StepId>,
    pub submitted_steps: Vec<StepId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_comment: Option<String>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Session storage so the service can be exercised without a backing store.
pub trait WizardSessionStore: Send + Sync {
    fn insert(&self, session: WizardSession) -> Result<WizardSession, SessionStoreError>;
    fn update(&self, session: WizardSession) -> Result<(), SessionStoreError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<WizardSession>, SessionStoreError>;
    fn remove(&self, id: &SessionId) -> Result<Option<WizardSession>, SessionStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
