//! Header-based column suggestions.
//!
//! The backend computes suggestions during upload and those are what seed a
//! mapping. This engine reproduces its pattern table so the client can fill
//! columns the server left unsuggested, when the user asks for it.

use std::collections::BTreeMap;

use roster_model::{CanonicalField, ColumnMapping, FileIntrospection};
use tracing::debug;

use crate::patterns::build_field_patterns;
use crate::utils::normalize_text;

/// Proposes canonical fields for raw headers.
#[derive(Debug, Clone)]
pub struct SuggestionEngine {
    patterns: BTreeMap<CanonicalField, Vec<String>>,
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SuggestionEngine {
    pub fn new() -> Self {
        Self {
            patterns: build_field_patterns(),
        }
    }

    /// Best field for a single header, or `None`.
    #[must_use]
    pub fn suggest(&self, raw_header: &str) -> Option<CanonicalField> {
        let normalized = normalize_text(raw_header);
        if normalized.is_empty() {
            return None;
        }
        self.patterns
            .iter()
            .find(|(_, values)| values.contains(&normalized))
            .map(|(field, _)| *field)
    }

    /// Suggestions for a whole header list.
    ///
    /// Each field claims at most the first matching column, fields taking
    /// turns in canonical order.
    #[must_use]
    pub fn suggest_all(&self, columns: &[String]) -> BTreeMap<String, CanonicalField> {
        let normalized: Vec<String> = columns.iter().map(|c| normalize_text(c)).collect();
        let mut suggestions = BTreeMap::new();
        for (field, values) in &self.patterns {
            let claimed = columns
                .iter()
                .zip(&normalized)
                .find(|(column, norm)| {
                    !suggestions.contains_key(column.as_str()) && values.contains(*norm)
                })
                .map(|(column, _)| column.clone());
            if let Some(column) = claimed {
                suggestions.insert(column, *field);
            }
        }
        suggestions
    }

    /// Map columns the server did not suggest and the user has not mapped.
    ///
    /// Never overrides an existing entry and never targets a field that is
    /// already mapped. Returns what was added.
    pub fn fill_gaps(
        &self,
        introspection: &FileIntrospection,
        mapping: &mut ColumnMapping,
    ) -> Vec<(String, CanonicalField)> {
        let open: Vec<String> = introspection
            .columns
            .iter()
            .filter(|c| introspection.suggestion_for(c).is_none() && mapping.get(c).is_none())
            .cloned()
            .collect();
        let mut added = Vec::new();
        for (column, field) in self.suggest_all(&open) {
            if mapping.is_targeted(field) {
                continue;
            }
            debug!(column = %column, field = %field, "local suggestion applied");
            mapping.set(column.clone(), field);
            added.push((column, field));
        }
        added
    }
}
