//! Mapping presets for reusing a mapping across uploads.
//!
//! A preset is the mapping of one earlier upload, stored as JSON. Applying it
//! to a new file sets every column the new file also has; columns the file
//! lacks are skipped and reported.
//!
//! # Storage Format
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "description": "semester roster export",
//!   "mapping": { "Roll No": "student_id", "Att%": "attendance_percentage" }
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use roster_model::{CanonicalField, ColumnMapping};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::MappingError;
use crate::state::MappingMachine;

/// Stored mapping with format metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingPreset {
    /// Version of the preset format.
    #[serde(default = "default_version")]
    pub version: String,
    /// Optional description or notes about this preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub mapping: ColumnMapping,
}

fn default_version() -> String {
    "1.0".to_string()
}

/// What applying a preset changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetApplication {
    pub applied: Vec<(String, CanonicalField)>,
    /// Preset columns the current file does not have.
    pub skipped: Vec<String>,
}

impl MappingPreset {
    pub fn new(mapping: ColumnMapping) -> Self {
        Self {
            version: default_version(),
            description: None,
            mapping,
        }
    }

    /// Add a description to this preset.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read mapping preset from {}", path.display()))?;
        let preset: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse mapping preset from {}", path.display()))?;
        Ok(preset)
    }

    /// Write the preset, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize mapping preset")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write mapping preset to {}", path.display()))?;
        info!(path = %path.display(), entries = self.mapping.len(), "saved mapping preset");
        Ok(())
    }

    /// Apply to the machine's current mapping.
    pub fn apply_to(&self, machine: &mut MappingMachine) -> Result<PresetApplication, MappingError> {
        let mut application = PresetApplication::default();
        for (column, field) in self.mapping.iter() {
            match machine.set_mapping(column, Some(field)) {
                Ok(_) => application.applied.push((column.to_string(), field)),
                Err(MappingError::ColumnNotFound(missing)) => application.skipped.push(missing),
                Err(other) => return Err(other),
            }
        }
        Ok(application)
    }
}
