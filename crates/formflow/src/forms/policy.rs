use serde::Serialize;
use std::collections::BTreeSet;

/// Which fields of a step form take part in validation, rendering and merge.
///
/// A policy is either an include list or an exclude list, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "fields", rename_all = "snake_case")]
pub enum FieldPolicy {
    Include(BTreeSet<&'static str>),
    Exclude(BTreeSet<&'static str>),
}

impl FieldPolicy {
    pub fn include<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = &'static str>,
    {
        Self::Include(fields.into_iter().collect())
    }

    pub fn exclude<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = &'static str>,
    {
        Self::Exclude(fields.into_iter().collect())
    }

    /// Every field of the record.
    pub fn all() -> Self {
        Self::Exclude(BTreeSet::new())
    }

    pub fn declared_fields(&self) -> &BTreeSet<&'static str> {
        match self {
            Self::Include(fields) | Self::Exclude(fields) => fields,
        }
    }

    /// Resolves the policy against the real field set of a record.
    ///
    /// Include names that the record does not have are dropped.
    pub fn resolve<I>(&self, available: I) -> FieldSelection
    where
        I: IntoIterator<Item = &'static str>,
    {
        let fields = available
            .into_iter()
            .filter(|name| match self {
                Self::Include(included) => included.contains(name),
                Self::Exclude(excluded) => !excluded.contains(name),
            })
            .collect();
        FieldSelection(fields)
    }
}

/// A resolved policy: the concrete field names a step operates on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldSelection(BTreeSet<&'static str>);

impl FieldSelection {
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn intersection(&self, other: &FieldSelection) -> Vec<&'static str> {
        self.0.intersection(&other.0).copied().collect()
    }
}
