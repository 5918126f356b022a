//! Raw column to canonical field assignments.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::field::{CanonicalField, REQUIRED_FIELDS};

/// Mapping from raw column header to canonical field.
///
/// A raw column appears at most once. A column with no entry is unmapped.
/// Serializes as a flat JSON object (`{"Roll No": "student_id"}`), which is
/// the shape the processing endpoint expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    entries: BTreeMap<String, CanonicalField>,
}

impl ColumnMapping {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `field` to `column`, returning the previous assignment.
    pub fn set(&mut self, column: impl Into<String>, field: CanonicalField) -> Option<CanonicalField> {
        self.entries.insert(column.into(), field)
    }

    /// Unmap `column`, returning the previous assignment.
    pub fn clear(&mut self, column: &str) -> Option<CanonicalField> {
        self.entries.remove(column)
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<CanonicalField> {
        self.entries.get(column).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, CanonicalField)> {
        self.entries.iter().map(|(column, field)| (column.as_str(), *field))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct fields currently targeted.
    #[must_use]
    pub fn targets(&self) -> BTreeSet<CanonicalField> {
        self.entries.values().copied().collect()
    }

    /// Whether any column maps to `field`.
    #[must_use]
    pub fn is_targeted(&self, field: CanonicalField) -> bool {
        self.entries.values().any(|f| *f == field)
    }

    /// Required fields no column maps to, in canonical order.
    #[must_use]
    pub fn missing_required(&self) -> Vec<CanonicalField> {
        let targets = self.targets();
        REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| !targets.contains(field))
            .collect()
    }

    /// Fields targeted by more than one column, with those columns.
    #[must_use]
    pub fn duplicate_targets(&self) -> BTreeMap<CanonicalField, Vec<String>> {
        let mut by_field: BTreeMap<CanonicalField, Vec<String>> = BTreeMap::new();
        for (column, field) in &self.entries {
            by_field.entry(*field).or_default().push(column.clone());
        }
        by_field.retain(|_, columns| columns.len() > 1);
        by_field
    }
}

impl FromIterator<(String, CanonicalField)> for ColumnMapping {
    fn from_iter<I: IntoIterator<Item = (String, CanonicalField)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
