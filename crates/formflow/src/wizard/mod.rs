//! Session-scoped wizard lifecycle on top of the step-form aggregator.

pub mod router;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use router::wizard_router;
pub use service::{
    ConfirmView, Prefill, StartRequest, StepView, WizardService, WizardServiceError,
};
pub use session::{SessionId, SessionStoreError, SessionView, WizardSession, WizardSessionStore};
