//! Data model shared by the roster ingestion crates.
//!
//! Wire types mirror the backend's REST payloads. Decoding is strict: a
//! response missing a required key, or naming a canonical field the client
//! does not know, fails instead of falling through to an empty value.

pub mod error;
pub mod field;
pub mod file;
pub mod introspection;
pub mod mapping;
pub mod multi;
pub mod processing;
pub mod session;
pub mod template;

pub use error::{ModelError, Result};
pub use field::{CanonicalField, REQUIRED_FIELDS};
pub use file::{FileFormat, MAX_UPLOAD_BYTES, UploadedFile};
pub use introspection::{ColumnInfo, FileIntrospection, SampleRow, UploadResponse};
pub use mapping::ColumnMapping;
pub use multi::{
    DEFAULT_MULTI_COLLEGE, MatchingResults, MergeResult, MultiUpload, SourceKind,
};
pub use processing::{
    MlTraining, ProcessResponse, ProcessingResult, ProcessingStats, ValidationSummary,
};
pub use session::{SessionContext, SessionId, UserRole};
pub use template::SampleFormat;
