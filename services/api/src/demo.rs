use crate::infra::InMemorySessionStore;
use chrono::NaiveDate;
use clap::Args;
use formflow::error::AppError;
use formflow::forms::{
    CareerForm, ConfirmForm, PersonForm, StepId, WizardDefinition, INPUT_STEP_1, INPUT_STEP_2,
    INPUT_STEP_3,
};
use formflow::wizard::{Prefill, StartRequest, WizardService, WizardServiceError};
use serde_json::{json, Map, Value};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Name entered on the first input step
    #[arg(long, default_value = "Alice")]
    pub(crate) name: String,
    /// Birthday entered on the first input step (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) birthday: Option<NaiveDate>,
    /// Languages entered on the second input step (EN, JA, ZH)
    #[arg(long, value_delimiter = ',', default_value = "EN")]
    pub(crate) language: Vec<String>,
    /// Memo entered on the second input step
    #[arg(long, default_value = "Prefers e-mail contact")]
    pub(crate) memo: String,
    /// Start from a stored person record, as an edit session would
    #[arg(long)]
    pub(crate) edit: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = WizardService::new(
        Arc::new(InMemorySessionStore::default()),
        WizardDefinition::splitted_input(),
    );

    let request = if args.edit {
        StartRequest {
            prefill: Some(stored_record()),
            input_comment: Some("Editing an existing person record".to_string()),
        }
    } else {
        StartRequest::default()
    };
    let session = service.start(request)?;

    println!("Splitted input wizard demo");
    println!("Session {} starts at {}", session.id, session.current_step);
    if let Some(comment) = session.aggregator.aggregate().input_comment() {
        println!("Input comment: {comment}");
    }

    for (step, input) in demo_inputs(&args) {
        let step = StepId::from(step);
        let view = service.step_view(&session.id, &step)?;
        println!(
            "\n[{}] {} form, fields: {}",
            step,
            view.form,
            view.fields.join(", ")
        );

        match service.submit(&session.id, &step, &input) {
            Ok(updated) => println!("- accepted, next step {}", updated.current_step),
            Err(WizardServiceError::Validation(violations)) => {
                println!("- rejected");
                for violation in violations {
                    println!("  - {}: {}", violation.field, violation.message);
                }
                service.abandon(&session.id)?;
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        }
    }

    let confirm = service.confirm(&session.id)?;
    println!("\n[{}]", StepId::confirm());
    render_confirm(&confirm.confirm);

    service.complete(&session.id)?;
    println!("\n[{}] session {} discarded", StepId::complete(), session.id);
    Ok(())
}

fn demo_inputs(args: &DemoArgs) -> Vec<(&'static str, Map<String, Value>)> {
    let mut person = Map::new();
    person.insert("name".to_string(), json!(args.name));
    person.insert("sex".to_string(), json!("F"));
    person.insert("bloodtype".to_string(), json!("A"));
    if let Some(birthday) = args.birthday {
        person.insert("birthday".to_string(), json!(birthday));
    }

    let mut preferences = Map::new();
    preferences.insert("language".to_string(), json!(args.language));
    preferences.insert("memo".to_string(), json!(args.memo));

    let mut career = Map::new();
    career.insert(
        "educations".to_string(),
        json!([{ "year": 2006, "description": "B.Sc. Computer Science" }]),
    );
    career.insert(
        "jobs".to_string(),
        json!([{ "year": 2010, "description": "Support engineer" }]),
    );

    vec![
        (INPUT_STEP_1, person),
        (INPUT_STEP_2, preferences),
        (INPUT_STEP_3, career),
    ]
}

fn stored_record() -> Prefill {
    Prefill {
        person: PersonForm {
            id: Some(42),
            name: Some("Stored Name".to_string()),
            age: Some(36),
            memo: Some("Imported from the previous system".to_string()),
            ..PersonForm::default()
        },
        career: CareerForm::default(),
    }
}

fn render_confirm(confirm: &ConfirmForm) {
    let person = &confirm.person;
    println!("- name: {}", person.name.as_deref().unwrap_or("-"));
    if let Some(birthday) = person.birthday {
        println!("- birthday: {birthday}");
    }
    if let Some(bloodtype) = person.bloodtype {
        println!("- blood type: {}", bloodtype.label());
    }
    if let Some(sex) = person.sex {
        println!("- sex: {}", sex.label());
    }
    let languages: Vec<_> = person.language.0.iter().map(|language| language.label()).collect();
    println!("- languages: {}", languages.join(", "));
    println!("- memo: {}", person.memo.as_deref().unwrap_or("-"));

    for education in &confirm.career.educations {
        println!(
            "- education {}: {}",
            education.year.map_or_else(|| "-".to_string(), |year| year.to_string()),
            education.description.as_deref().unwrap_or("-")
        );
    }
    for job in &confirm.career.jobs {
        println!(
            "- job {}: {}",
            job.year.map_or_else(|| "-".to_string(), |year| year.to_string()),
            job.description.as_deref().unwrap_or("-")
        );
    }
}
