//! Server-side description of an uploaded file.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ModelError;
use crate::field::CanonicalField;
use crate::session::SessionId;

/// One preview row, keyed by raw column name.
pub type SampleRow = BTreeMap<String, serde_json::Value>;

/// Column detection block of the upload response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Raw headers in file order. Spreadsheet headers may arrive as
    /// numbers (a `2024` cell); they are kept as their decimal text.
    #[serde(deserialize_with = "header_names")]
    pub user_columns: Vec<String>,
    /// Raw header -> suggested field. Absent headers have no suggestion.
    #[serde(default)]
    pub suggestions: BTreeMap<String, CanonicalField>,
}

fn header_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Header {
        Text(String),
        Number(serde_json::Number),
        Flag(bool),
    }

    let headers = Vec::<Header>::deserialize(deserializer)?;
    Ok(headers
        .into_iter()
        .map(|header| match header {
            Header::Text(text) => text,
            Header::Number(number) => number.to_string(),
            Header::Flag(flag) => flag.to_string(),
        })
        .collect())
}

/// Body of a successful `POST /upload-file`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub session_id: SessionId,
    pub filename: String,
    pub total_rows: u64,
    pub column_info: ColumnInfo,
    #[serde(default)]
    pub sample_data: Vec<SampleRow>,
}

/// What the client knows about an uploaded file for the rest of its session.
#[derive(Debug, Clone, PartialEq)]
pub struct FileIntrospection {
    pub session_id: SessionId,
    pub filename: String,
    pub total_rows: u64,
    pub columns: Vec<String>,
    pub suggestions: BTreeMap<String, CanonicalField>,
    pub sample_rows: Vec<SampleRow>,
}

impl FileIntrospection {
    /// Whether `column` is one of the file's raw headers.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Suggested field for a raw header.
    #[must_use]
    pub fn suggestion_for(&self, column: &str) -> Option<CanonicalField> {
        self.suggestions.get(column).copied()
    }

    /// First `limit` sample rows as display strings, in column order.
    #[must_use]
    pub fn preview(&self, limit: usize) -> Vec<Vec<String>> {
        self.sample_rows
            .iter()
            .take(limit)
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| row.get(column).map(display_value).unwrap_or_default())
                    .collect()
            })
            .collect()
    }
}

impl TryFrom<UploadResponse> for FileIntrospection {
    type Error = ModelError;

    fn try_from(response: UploadResponse) -> Result<Self, Self::Error> {
        let UploadResponse {
            session_id,
            filename,
            total_rows,
            column_info,
            sample_data,
        } = response;
        if let Some(stray) = column_info
            .suggestions
            .keys()
            .find(|key| !column_info.user_columns.contains(key))
        {
            return Err(ModelError::UnknownColumn(stray.clone()));
        }
        Ok(Self {
            session_id,
            filename,
            total_rows,
            columns: column_info.user_columns,
            suggestions: column_info.suggestions,
            sample_rows: sample_data,
        })
    }
}

/// Render a JSON cell the way a spreadsheet would show it.
#[must_use]
pub fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
