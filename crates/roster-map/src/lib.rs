//! Column mapping for roster uploads.
//!
//! - [`guard`]: accept or reject selected files before anything is sent.
//! - [`suggest`]: propose a canonical field for a raw header.
//! - [`completeness`]: decide whether a mapping may be submitted.
//! - [`state`]: the upload/mapping/processing state machine.
//! - [`preset`]: save a mapping and re-apply it to a later file.

#![deny(unsafe_code)]

pub mod completeness;
pub mod error;
pub mod guard;
pub mod patterns;
pub mod preset;
pub mod state;
pub mod suggest;
pub mod utils;

pub use completeness::Readiness;
pub use error::MappingError;
pub use guard::{FileRejection, SourceRejection, check_file, check_sources};
pub use preset::{MappingPreset, PresetApplication};
pub use state::{MappingMachine, Phase, ProcessTicket, UploadTicket};
pub use suggest::SuggestionEngine;
pub use utils::normalize_text;
