use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::OnceLock;

use super::fields::{field_table, FieldTable, FormRecord};

/// Identifier used for education rows that are not attached to a person yet.
pub const UNASSIGNED_PERSON_ID: i64 = -1;

/// Years offered for education rows.
pub const EDUCATION_YEARS: RangeInclusive<u16> = 2000..=2010;

const NAME_MAX_CHARS: usize = 50;
const MEMO_MAX_CHARS: usize = 500;
const AGE_MAX: u16 = 150;

/// The sub-record types a step form can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    Person,
    Career,
}

impl FormKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Person => "Person",
            Self::Career => "Career",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BloodType {
    A,
    B,
    O,
    Ab,
}

impl BloodType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::O => "O",
            Self::Ab => "AB",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Language {
    En,
    Ja,
    Zh,
}

impl Language {
    pub const fn label(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Ja => "Japanese",
            Self::Zh => "Chinese",
        }
    }
}

/// Checkbox-style language selection. Accepts a single value, a list, or
/// null (cleared) on input and always serializes as a list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Languages(pub Vec<Language>);

impl<'de> Deserialize<'de> for Languages {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            Cleared,
            One(Language),
            Many(Vec<Language>),
        }

        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::Cleared => Self::default(),
            OneOrMany::One(language) => Self(vec![language]),
            OneOrMany::Many(languages) => Self(languages),
        })
    }
}

impl Languages {
    pub fn contains(&self, language: Language) -> bool {
        self.0.contains(&language)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Language>> for Languages {
    fn from(value: Vec<Language>) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonForm {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub age: Option<u16>,
    pub birthday: Option<NaiveDate>,
    pub bloodtype: Option<BloodType>,
    pub sex: Option<Sex>,
    pub language: Languages,
    pub memo: Option<String>,
}

impl FormRecord for PersonForm {
    const KIND: FormKind = FormKind::Person;

    fn field_table() -> &'static FieldTable<Self> {
        static TABLE: OnceLock<FieldTable<PersonForm>> = OnceLock::new();
        TABLE.get_or_init(|| {
            field_table!(PersonForm {
                id,
                name,
                age,
                birthday,
                bloodtype,
                sex,
                language,
                memo,
            })
        })
    }

    fn check_field(&self, field: &str) -> Vec<String> {
        let mut problems = Vec::new();
        match field {
            "name" => match self.name.as_deref().map(str::trim) {
                None | Some("") => problems.push("name is required".to_string()),
                Some(name) if name.chars().count() > NAME_MAX_CHARS => {
                    problems.push(format!("name must be at most {NAME_MAX_CHARS} characters"))
                }
                Some(_) => {}
            },
            "age" => {
                if self.age.is_some_and(|age| age > AGE_MAX) {
                    problems.push(format!("age must be at most {AGE_MAX}"));
                }
            }
            "birthday" => {
                let today = Local::now().date_naive();
                if self.birthday.is_some_and(|birthday| birthday > today) {
                    problems.push("birthday cannot be in the future".to_string());
                }
            }
            "memo" => {
                if self
                    .memo
                    .as_deref()
                    .is_some_and(|memo| memo.chars().count() > MEMO_MAX_CHARS)
                {
                    problems.push(format!("memo must be at most {MEMO_MAX_CHARS} characters"));
                }
            }
            _ => {}
        }
        problems
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub person_id: i64,
    pub year: Option<u16>,
    pub description: Option<String>,
}

impl EducationEntry {
    /// Blank row handed to clients that add education entries.
    pub fn template() -> Self {
        Self {
            person_id: UNASSIGNED_PERSON_ID,
            year: None,
            description: None,
        }
    }
}

impl Default for EducationEntry {
    fn default() -> Self {
        Self::template()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobEntry {
    pub year: Option<u16>,
    pub description: Option<String>,
}

/// Education and job history entered as repeatable rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CareerForm {
    pub educations: Vec<EducationEntry>,
    pub jobs: Vec<JobEntry>,
}

impl FormRecord for CareerForm {
    const KIND: FormKind = FormKind::Career;

    fn field_table() -> &'static FieldTable<Self> {
        static TABLE: OnceLock<FieldTable<CareerForm>> = OnceLock::new();
        TABLE.get_or_init(|| field_table!(CareerForm { educations, jobs }))
    }

    fn check_field(&self, field: &str) -> Vec<String> {
        match field {
            "educations" => self
                .educations
                .iter()
                .enumerate()
                .filter_map(|(index, entry)| match entry.year {
                    Some(year) if EDUCATION_YEARS.contains(&year) => None,
                    Some(year) => Some(format!(
                        "education #{} year {year} must be between {} and {}",
                        index + 1,
                        EDUCATION_YEARS.start(),
                        EDUCATION_YEARS.end()
                    )),
                    None => Some(format!("education #{} year is required", index + 1)),
                })
                .collect(),
            "jobs" => self
                .jobs
                .iter()
                .enumerate()
                .filter(|(_, entry)| {
                    entry
                        .description
                        .as_deref()
                        .map_or(true, |description| description.trim().is_empty())
                })
                .map(|(index, _)| format!("job #{} description is required", index + 1))
                .collect(),
            _ => Vec::new(),
        }
    }
}
