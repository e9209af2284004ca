use serde_json::json;

use super::common::*;
use crate::forms::records::{CareerForm, PersonForm};
use crate::forms::{
    ConfirmForm, FormFlowError, StepForm, INPUT_STEP_1, INPUT_STEP_2, INPUT_STEP_3,
};

#[test]
fn fresh_aggregate_has_empty_step_forms() {
    let aggregator = aggregator();
    let aggregate = aggregator.aggregate();

    assert_eq!(
        aggregate.step_form(&step(INPUT_STEP_1)),
        Some(&StepForm::Person(PersonForm::default()))
    );
    assert_eq!(
        aggregate.step_form(&step(INPUT_STEP_3)),
        Some(&StepForm::Career(CareerForm::default()))
    );
    assert!(aggregate.step_form(&step("confirm")).is_none());
}

#[test]
fn submit_step_stores_the_form_in_place_and_merges() {
    let mut aggregator = aggregator();

    aggregator
        .submit_step(&step(INPUT_STEP_3), StepForm::Career(career()))
        .expect("career submission");

    assert_eq!(
        aggregator.aggregate().step_form(&step(INPUT_STEP_3)),
        Some(&StepForm::Career(career()))
    );
    assert_eq!(aggregator.merged_result().career, career());
}

#[test]
fn submit_step_rejects_undeclared_and_mismatched_steps() {
    let mut aggregator = aggregator();

    let unknown = aggregator
        .submit_step(&step("input-4"), StepForm::Person(person()))
        .expect_err("undeclared step");
    assert!(matches!(unknown, FormFlowError::UnknownStep(_)));

    let mismatch = aggregator
        .submit_step(&step(INPUT_STEP_1), StepForm::Career(career()))
        .expect_err("wrong form kind");
    assert!(matches!(mismatch, FormFlowError::StepFormMismatch { .. }));
    assert_eq!(
        aggregator.aggregate().step_form(&step(INPUT_STEP_1)),
        Some(&StepForm::Person(PersonForm::default()))
    );
}

#[test]
fn prefill_copies_records_into_every_step_form() {
    let mut aggregator = aggregator();
    aggregator.aggregate_mut().prefill(&person(), &career());

    let aggregate = aggregator.aggregate();
    assert_eq!(
        aggregate.step_form(&step(INPUT_STEP_1)),
        Some(&StepForm::Person(person()))
    );
    assert_eq!(
        aggregate.step_form(&step(INPUT_STEP_2)),
        Some(&StepForm::Person(person()))
    );
    assert_eq!(
        aggregate.step_form(&step(INPUT_STEP_3)),
        Some(&StepForm::Career(career()))
    );
    assert_eq!(aggregator.merged_result(), &ConfirmForm::default());
}

#[test]
fn populate_and_validate_follow_the_step_selection() {
    let aggregator = aggregator();
    let binding = aggregator
        .definition()
        .binding(&step(INPUT_STEP_2))
        .expect("input-2 declared");
    let selection = binding.selection();
    let mut form = StepForm::empty(binding.kind());

    let input = json!({ "name": "", "language": "EN", "memo": "x" });
    let written = form
        .populate(&selection, input.as_object().expect("object"))
        .expect("values parse");

    assert_eq!(written, vec!["language", "memo"]);
    assert!(form.validate(&selection).is_empty());

    let snapshot = form.snapshot(&selection).expect("snapshot");
    assert_eq!(snapshot["language"], json!(["EN"]));
    assert!(!snapshot.contains_key("name"));
}

#[test]
fn blank_input_comment_is_dropped() {
    let mut aggregator = aggregator();
    aggregator.aggregate_mut().prefill(&person(), &career());
    aggregator
        .aggregate_mut()
        .set_input_comment(Some("   ".to_string()));
    assert!(aggregator.aggregate().input_comment().is_none());

    aggregator
        .aggregate_mut()
        .set_input_comment(Some("call back".to_string()));
    assert_eq!(aggregator.aggregate().input_comment(), Some("call back"));
}

#[test]
fn input_comment_is_hidden_outside_edit_mode() {
    let mut aggregator = aggregator();
    aggregator
        .aggregate_mut()
        .set_input_comment(Some("call back".to_string()));
    assert!(!aggregator.aggregate().is_editing());
    assert!(aggregator.aggregate().input_comment().is_none());

    aggregator.aggregate_mut().prefill(&person(), &career());
    assert!(aggregator.aggregate().is_editing());
    assert_eq!(aggregator.aggregate().input_comment(), Some("call back"));
}
