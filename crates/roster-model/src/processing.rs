//! Outcome of submitting a file and its mapping for processing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Server-side validation block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Model training outcome reported alongside the stats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MlTraining {
    #[serde(default)]
    pub random_forest_accuracy: Option<f64>,
    /// Anything else the backend reports (`message`, `error`, other scores).
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Summary statistics of a processed upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStats {
    #[serde(default)]
    pub total_students: Option<u64>,
    #[serde(default)]
    pub high_risk_students: Option<u64>,
    #[serde(default)]
    pub ml_training: Option<MlTraining>,
    #[serde(default)]
    pub validation: Option<ValidationSummary>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ProcessingStats {
    /// Random forest accuracy as a whole percentage.
    #[must_use]
    pub fn accuracy_percent(&self) -> Option<u32> {
        self.ml_training
            .as_ref()
            .and_then(|ml| ml.random_forest_accuracy)
            .filter(|accuracy| accuracy.is_finite() && *accuracy > 0.0)
            .map(|accuracy| (accuracy * 100.0).round() as u32)
    }
}

/// Body of a `POST /process-data` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub stats: Option<ProcessingStats>,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
    #[serde(default)]
    pub warnings: Option<Vec<String>>,
    #[serde(default)]
    pub validation: Option<ValidationSummary>,
}

/// Immutable result of one processing call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingResult {
    pub success: bool,
    pub stats: ProcessingStats,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ProcessingResult {
    /// Message describing why processing did not succeed.
    #[must_use]
    pub fn failure_message(&self) -> String {
        if self.errors.is_empty() {
            "Processing failed".to_string()
        } else {
            self.errors.join(", ")
        }
    }
}

impl From<ProcessResponse> for ProcessingResult {
    fn from(response: ProcessResponse) -> Self {
        let stats = response.stats.unwrap_or_default();
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let blocks = [response.validation.as_ref(), stats.validation.as_ref()];
        for message in response
            .errors
            .iter()
            .flatten()
            .chain(blocks.iter().flatten().flat_map(|v| v.errors.iter()))
        {
            push_unique(&mut errors, message);
        }
        for message in response
            .warnings
            .iter()
            .flatten()
            .chain(blocks.iter().flatten().flat_map(|v| v.warnings.iter()))
        {
            push_unique(&mut warnings, message);
        }
        Self {
            success: response.success,
            stats,
            errors,
            warnings,
        }
    }
}

fn push_unique(target: &mut Vec<String>, message: &str) {
    if !target.iter().any(|existing| existing == message) {
        target.push(message.to_string());
    }
}
