use std::sync::Arc;

use chrono::NaiveDate;

use crate::forms::records::{
    BloodType, CareerForm, EducationEntry, JobEntry, Language, Languages, PersonForm, Sex,
};
use crate::forms::{StepFormAggregator, StepId, WizardDefinition};

pub(super) fn aggregator() -> StepFormAggregator {
    StepFormAggregator::new(Arc::new(WizardDefinition::splitted_input()))
}

pub(super) fn step(id: &str) -> StepId {
    StepId::from(id)
}

pub(super) fn person() -> PersonForm {
    PersonForm {
        id: Some(7),
        name: Some("A".to_string()),
        age: Some(34),
        birthday: NaiveDate::from_ymd_opt(1990, 4, 1),
        bloodtype: Some(BloodType::O),
        sex: Some(Sex::Male),
        language: Languages(vec![Language::En]),
        memo: Some("x".to_string()),
    }
}

pub(super) fn career() -> CareerForm {
    CareerForm {
        educations: vec![EducationEntry {
            person_id: 7,
            year: Some(2004),
            description: Some("University".to_string()),
        }],
        jobs: vec![JobEntry {
            year: Some(2008),
            description: Some("Engineer".to_string()),
        }],
    }
}
