//! Completeness guard for submission.

use std::collections::BTreeMap;
use std::fmt;

use roster_model::{CanonicalField, ColumnMapping};

/// Whether a mapping may be submitted, and if not, why.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Readiness {
    /// Required fields no column maps to.
    pub missing: Vec<CanonicalField>,
    /// Fields more than one column maps to.
    pub duplicates: BTreeMap<CanonicalField, Vec<String>>,
}

impl Readiness {
    /// Evaluate a mapping from its current values only.
    #[must_use]
    pub fn evaluate(mapping: &ColumnMapping) -> Self {
        Self {
            missing: mapping.missing_required(),
            duplicates: mapping.duplicate_targets(),
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.missing.is_empty() && self.duplicates.is_empty()
    }

    #[must_use]
    pub fn is_blocked(&self) -> bool {
        !self.is_ready()
    }
}

impl fmt::Display for Readiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ready() {
            return write!(f, "ready");
        }
        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            let fields: Vec<&str> = self.missing.iter().map(CanonicalField::id).collect();
            parts.push(format!("Missing: {}", fields.join(", ")));
        }
        for (field, columns) in &self.duplicates {
            parts.push(format!("{field} mapped from {}", columns.join(", ")));
        }
        write!(f, "{}", parts.join("; "))
    }
}
