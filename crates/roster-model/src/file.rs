//! The file a user picked for upload.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Largest accepted upload, inclusive (10 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Tabular formats the backend can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Xlsx,
    Xls,
}

impl FileFormat {
    /// Match a bare extension (no dot), ignoring ASCII case.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            "xls" => Some(Self::Xls),
            _ => None,
        }
    }

    /// MIME type sent with the multipart upload.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Xls => "application/vnd.ms-excel",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Xlsx => write!(f, "xlsx"),
            Self::Xls => write!(f, "xls"),
        }
    }
}

/// A user-selected file.
///
/// Built once per selection and replaced wholesale when the user picks
/// another file. The bytes stay on disk until the gateway reads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub size: u64,
    pub path: PathBuf,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, size: u64, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            size,
            path: path.into(),
        }
    }

    /// Describe a file on disk from its metadata.
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ModelError::MissingFileName(path.display().to_string()))?;
        Ok(Self::new(name, metadata.len(), path))
    }

    /// Text after the final dot of the file name, if any.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(_, ext)| ext)
    }

    /// Format implied by the extension.
    #[must_use]
    pub fn format(&self) -> Option<FileFormat> {
        self.extension().and_then(FileFormat::from_extension)
    }
}
