use serde::{Deserialize, Serialize};

use crate::introspection::{SampleRow, display_value};

/// Reference layout served by `GET /sample-format`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleFormat {
    pub columns: Vec<String>,
    pub sample_rows: Vec<SampleRow>,
}

impl SampleFormat {
    /// Values of the first sample row in column order; blanks where absent.
    #[must_use]
    pub fn first_row_values(&self) -> Vec<String> {
        let row = self.sample_rows.first();
        self.columns
            .iter()
            .map(|column| {
                row.and_then(|r| r.get(column))
                    .map(display_value)
                    .unwrap_or_default()
            })
            .collect()
    }
}
