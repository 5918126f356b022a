//! Separate attendance, marks, and fees files merged by `student_id`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::file::UploadedFile;
use crate::session::SessionId;

/// College used in generated session ids when the context names none.
pub const DEFAULT_MULTI_COLLEGE: &str = "gpj";

/// Kind of data held by one file of a multi-source upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Attendance,
    Marks,
    Fees,
}

impl SourceKind {
    pub const ALL: [Self; 3] = [Self::Attendance, Self::Marks, Self::Fees];

    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Attendance => "attendance",
            Self::Marks => "marks",
            Self::Fees => "fees",
        }
    }

    /// Multipart field the file is sent under.
    #[must_use]
    pub const fn form_field(&self) -> &'static str {
        match self {
            Self::Attendance => "attendance_file",
            Self::Marks => "marks_file",
            Self::Fees => "fees_file",
        }
    }

    /// Headers the backend requires in a file of this kind.
    #[must_use]
    pub const fn required_columns(&self) -> &'static [&'static str] {
        match self {
            Self::Attendance => &["student_id", "attendance_percentage"],
            Self::Marks => &["student_id", "marks"],
            Self::Fees => &["student_id", "fees_paid", "fees_due", "payment_status"],
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SourceKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == normalized)
            .ok_or_else(|| ModelError::UnknownSource(s.to_string()))
    }
}

/// Up to one file per [`SourceKind`], kept in kind order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiUpload {
    files: BTreeMap<SourceKind, UploadedFile>,
}

impl MultiUpload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the file for `kind`, replacing any earlier one.
    pub fn insert(&mut self, kind: SourceKind, file: UploadedFile) -> Option<UploadedFile> {
        self.files.insert(kind, file)
    }

    #[must_use]
    pub fn with(mut self, kind: SourceKind, file: UploadedFile) -> Self {
        self.insert(kind, file);
        self
    }

    pub fn get(&self, kind: SourceKind) -> Option<&UploadedFile> {
        self.files.get(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SourceKind, &UploadedFile)> {
        self.files.iter().map(|(kind, file)| (*kind, file))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl SessionId {
    /// Client-generated id for a multi-source upload:
    /// `multi_upload_<college>_<millis>`.
    #[must_use]
    pub fn for_multi_upload(college: Option<&str>, unix_millis: u128) -> Self {
        let college = college
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(DEFAULT_MULTI_COLLEGE);
        Self::from(format!("multi_upload_{college}_{unix_millis}"))
    }
}

/// How well the uploaded sources lined up by `student_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchingResults {
    pub total_students: u64,
    /// Students present in all three sources.
    pub perfect_matches: u64,
    /// Students present in exactly two sources.
    pub partial_matches: u64,
    /// Share of perfect matches, in percent.
    pub data_completeness: f64,
    pub multi_area_risk_count: u64,
}

/// Body of a successful `POST /multi-upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeResult {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    /// Source kind id -> uploaded file name.
    #[serde(default)]
    pub uploaded_files: BTreeMap<String, String>,
    pub matching_results: MatchingResults,
    /// Students newly stored; existing ids are skipped by the backend.
    #[serde(default)]
    pub stored_count: u64,
    pub session_id: SessionId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_defaults_college() {
        assert_eq!(
            SessionId::for_multi_upload(Some("rtu"), 1_700_000_000_123).as_str(),
            "multi_upload_rtu_1700000000123"
        );
        assert_eq!(
            SessionId::for_multi_upload(None, 5).as_str(),
            "multi_upload_gpj_5"
        );
        assert_eq!(
            SessionId::for_multi_upload(Some("  "), 5).as_str(),
            "multi_upload_gpj_5"
        );
    }

    #[test]
    fn files_are_kept_in_kind_order() {
        let upload = MultiUpload::new()
            .with(SourceKind::Fees, UploadedFile::new("fees.csv", 1, "fees.csv"))
            .with(SourceKind::Attendance, UploadedFile::new("att.csv", 1, "att.csv"));
        let kinds: Vec<_> = upload.iter().map(|(kind, _)| kind).collect();
        assert_eq!(kinds, vec![SourceKind::Attendance, SourceKind::Fees]);
        assert!(upload.get(SourceKind::Marks).is_none());
    }

    #[test]
    fn decodes_merge_result() {
        let json = r#"{
            "success": true,
            "message": "Successfully processed 40 students",
            "uploaded_files": {"attendance": "att.csv", "marks": "marks.xlsx"},
            "matching_results": {
                "total_students": 40,
                "perfect_matches": 0,
                "partial_matches": 36,
                "data_completeness": 0.0,
                "multi_area_risk_count": 4
            },
            "risk_analysis": {"risk_distribution": {"High": 3}},
            "stored_count": 38,
            "session_id": "multi_upload_gpj_17"
        }"#;
        let result: MergeResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.matching_results.partial_matches, 36);
        assert_eq!(result.uploaded_files["marks"], "marks.xlsx");
        assert_eq!(result.stored_count, 38);
    }

    #[test]
    fn source_kind_parses_ids() {
        assert_eq!(" Fees ".parse::<SourceKind>().unwrap(), SourceKind::Fees);
        assert!("grades".parse::<SourceKind>().is_err());
    }
}
