use serde::{Deserialize, Serialize};
use std::fmt;

pub const INPUT_STEP_1: &str = "input-1";
pub const INPUT_STEP_2: &str = "input-2";
pub const INPUT_STEP_3: &str = "input-3";
pub const STEP_CONFIRM: &str = "confirm";
pub const STEP_COMPLETE: &str = "complete";

/// Opaque identifier of one wizard page.
///
/// Presentation order lives in [`super::WizardDefinition`]; everywhere else a
/// step is only a lookup key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(String);

impl StepId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn confirm() -> Self {
        Self::new(STEP_CONFIRM)
    }

    pub fn complete() -> Self {
        Self::new(STEP_COMPLETE)
    }

    /// `confirm` and `complete` belong to the flow itself and never carry a
    /// step form.
    pub fn is_reserved(&self) -> bool {
        self.0 == STEP_CONFIRM || self.0 == STEP_COMPLETE
    }
}

impl From<&str> for StepId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for StepId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_steps_are_detected() {
        assert!(StepId::confirm().is_reserved());
        assert!(StepId::complete().is_reserved());
        assert!(!StepId::from(INPUT_STEP_1).is_reserved());
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&StepId::from(INPUT_STEP_2)).expect("serializes");
        assert_eq!(json, "\"input-2\"");
    }
}
