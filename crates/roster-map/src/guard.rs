//! File-selection guard, applied before any network call.

use std::fmt;

use roster_model::{FileFormat, MAX_UPLOAD_BYTES, MultiUpload, SourceKind, UploadedFile};

/// Why a selected file was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileRejection {
    /// Extension is not csv, xlsx, or xls. `None` when the name has no dot.
    UnsupportedExtension(Option<String>),
    /// File is larger than [`MAX_UPLOAD_BYTES`].
    TooLarge { size: u64, limit: u64 },
}

impl FileRejection {
    /// Message shown to the user.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::UnsupportedExtension(_) => "Please select a CSV or Excel file.",
            Self::TooLarge { .. } => "File size must be less than 10MB.",
        }
    }
}

impl fmt::Display for FileRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedExtension(Some(ext)) => {
                write!(f, "unsupported file type '.{ext}' (expected .csv, .xlsx, or .xls)")
            }
            Self::UnsupportedExtension(None) => {
                write!(f, "file has no extension (expected .csv, .xlsx, or .xls)")
            }
            Self::TooLarge { size, limit } => {
                write!(f, "file is {size} bytes, larger than the {limit} byte limit")
            }
        }
    }
}

impl std::error::Error for FileRejection {}

/// Check a selected file's extension and size.
///
/// The extension is the text after the final dot, compared without regard
/// to case. A file of exactly [`MAX_UPLOAD_BYTES`] is accepted.
pub fn check_file(file: &UploadedFile) -> Result<FileFormat, FileRejection> {
    let Some(format) = file.format() else {
        return Err(FileRejection::UnsupportedExtension(
            file.extension().map(str::to_string),
        ));
    };
    if file.size > MAX_UPLOAD_BYTES {
        return Err(FileRejection::TooLarge {
            size: file.size,
            limit: MAX_UPLOAD_BYTES,
        });
    }
    Ok(format)
}

/// Why a multi-source upload was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRejection {
    /// No source file was given.
    NoFiles,
    /// One of the files failed [`check_file`].
    File {
        kind: SourceKind,
        rejection: FileRejection,
    },
}

impl SourceRejection {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NoFiles => "Please select at least one file to upload.".to_string(),
            Self::File { kind, rejection } => format!("{kind} file: {}", rejection.user_message()),
        }
    }
}

impl fmt::Display for SourceRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFiles => write!(f, "no source files selected"),
            Self::File { kind, rejection } => write!(f, "{kind} file: {rejection}"),
        }
    }
}

impl std::error::Error for SourceRejection {}

/// Check every file of a multi-source upload; the first failure wins.
pub fn check_sources(upload: &MultiUpload) -> Result<(), SourceRejection> {
    if upload.is_empty() {
        return Err(SourceRejection::NoFiles);
    }
    for (kind, file) in upload.iter() {
        check_file(file).map_err(|rejection| SourceRejection::File { kind, rejection })?;
    }
    Ok(())
}
