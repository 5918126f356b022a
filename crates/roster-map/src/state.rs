//! Upload and mapping state machine.
//!
//! The machine is the single owner of the uploaded file, its introspection,
//! and the column mapping. Front ends dispatch events (select a file, edit a
//! column, submit) and render from the accessors; they never hold a copy of
//! the mapping themselves.
//!
//! Network calls happen outside the machine. Starting one hands out a ticket
//! stamped with the current generation; the response is fed back with that
//! ticket. Selecting another file, resetting, or submitting bumps the
//! generation, so a response belonging to superseded work is refused instead
//! of overwriting newer state.

use std::fmt;

use roster_model::{
    CanonicalField, ColumnMapping, FileIntrospection, ProcessingResult, SessionId, UploadedFile,
};
use tracing::{debug, info, warn};

use crate::completeness::Readiness;
use crate::error::MappingError;
use crate::guard::{FileRejection, check_file};
use crate::suggest::SuggestionEngine;

/// Externally visible position in the flow.
///
/// `Introspected` from the upload design is not listed: it is left in the
/// same step it is entered, when the mapping is seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// File accepted, upload in flight.
    FileSelected,
    /// Mapping editable; `ready` is the completeness guard's verdict.
    Mapping { ready: bool },
    Processing,
    Completed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::FileSelected => write!(f, "uploading"),
            Self::Mapping { ready: true } => write!(f, "mapping (ready)"),
            Self::Mapping { ready: false } => write!(f, "mapping (blocked)"),
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Handle for an upload started by [`MappingMachine::select_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTicket {
    generation: u64,
    pub file: UploadedFile,
}

/// Handle for a processing call started by [`MappingMachine::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessTicket {
    generation: u64,
    pub session_id: SessionId,
    pub file: UploadedFile,
    pub mapping: ColumnMapping,
}

#[derive(Debug, Clone)]
struct Session {
    file: UploadedFile,
    introspection: FileIntrospection,
    mapping: ColumnMapping,
}

#[derive(Debug, Clone)]
enum Stage {
    Idle,
    Uploading(UploadedFile),
    Mapping(Session),
    Processing(Session),
    Completed {
        session: Session,
        result: ProcessingResult,
    },
}

/// State machine for one upload session at a time.
#[derive(Debug, Clone)]
pub struct MappingMachine {
    stage: Stage,
    generation: u64,
    last_error: Option<String>,
}

impl Default for MappingMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingMachine {
    pub fn new() -> Self {
        Self {
            stage: Stage::Idle,
            generation: 0,
            last_error: None,
        }
    }

    pub fn phase(&self) -> Phase {
        match &self.stage {
            Stage::Idle => Phase::Idle,
            Stage::Uploading(_) => Phase::FileSelected,
            Stage::Mapping(session) => Phase::Mapping {
                ready: Readiness::evaluate(&session.mapping).is_ready(),
            },
            Stage::Processing(_) => Phase::Processing,
            Stage::Completed { .. } => Phase::Completed,
        }
    }

    /// Current generation; bumped by every selection, reset, and submit.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Select a file to upload.
    ///
    /// A rejected file leaves the machine exactly as it was. An accepted one
    /// discards any previous session, introspection, and mapping.
    pub fn select_file(&mut self, file: UploadedFile) -> Result<UploadTicket, FileRejection> {
        if let Err(rejection) = check_file(&file) {
            warn!(file = %file.name, size = file.size, %rejection, "file rejected");
            return Err(rejection);
        }
        self.generation += 1;
        self.last_error = None;
        self.stage = Stage::Uploading(file.clone());
        debug!(file = %file.name, generation = self.generation, "file selected");
        Ok(UploadTicket {
            generation: self.generation,
            file,
        })
    }

    /// Feed back the outcome of an upload.
    ///
    /// Success seeds the mapping with every server suggestion. Failure
    /// returns to idle with the message kept for display.
    pub fn complete_upload(
        &mut self,
        ticket: &UploadTicket,
        outcome: Result<FileIntrospection, String>,
    ) -> Result<Phase, MappingError> {
        self.check_ticket(ticket.generation)?;
        let file = match std::mem::replace(&mut self.stage, Stage::Idle) {
            Stage::Uploading(file) => file,
            other => {
                self.stage = other;
                return Err(self.already_completed(ticket.generation));
            }
        };
        match outcome {
            Ok(introspection) => {
                let mapping: ColumnMapping = introspection
                    .suggestions
                    .iter()
                    .map(|(column, field)| (column.clone(), *field))
                    .collect();
                info!(
                    file = %file.name,
                    session = %introspection.session_id,
                    columns = introspection.columns.len(),
                    suggested = mapping.len(),
                    "file introspected"
                );
                self.stage = Stage::Mapping(Session {
                    file,
                    introspection,
                    mapping,
                });
            }
            Err(message) => {
                warn!(file = %file.name, error = %message, "upload failed");
                self.last_error = Some(message);
            }
        }
        Ok(self.phase())
    }

    /// Set (`Some`) or clear (`None`) the target of one raw column.
    pub fn set_mapping(
        &mut self,
        column: &str,
        field: Option<CanonicalField>,
    ) -> Result<Readiness, MappingError> {
        let phase = self.phase();
        let Stage::Mapping(session) = &mut self.stage else {
            return Err(MappingError::InvalidPhase {
                operation: "edit the mapping",
                phase,
            });
        };
        if !session.introspection.has_column(column) {
            return Err(MappingError::ColumnNotFound(column.to_string()));
        }
        match field {
            Some(field) => {
                session.mapping.set(column, field);
            }
            None => {
                session.mapping.clear(column);
            }
        }
        let readiness = Readiness::evaluate(&session.mapping);
        debug!(column, field = ?field, ready = readiness.is_ready(), "mapping edited");
        Ok(readiness)
    }

    /// Fill unsuggested, unmapped columns from the local suggestion engine.
    pub fn apply_local_suggestions(
        &mut self,
        engine: &SuggestionEngine,
    ) -> Result<Vec<(String, CanonicalField)>, MappingError> {
        let phase = self.phase();
        let Stage::Mapping(session) = &mut self.stage else {
            return Err(MappingError::InvalidPhase {
                operation: "apply suggestions",
                phase,
            });
        };
        Ok(engine.fill_gaps(&session.introspection, &mut session.mapping))
    }

    /// Start processing. Only allowed while the mapping is ready.
    pub fn submit(&mut self) -> Result<ProcessTicket, MappingError> {
        let phase = self.phase();
        let session = match std::mem::replace(&mut self.stage, Stage::Idle) {
            Stage::Mapping(session) => session,
            other => {
                self.stage = other;
                return Err(MappingError::InvalidPhase {
                    operation: "submit",
                    phase,
                });
            }
        };
        let readiness = Readiness::evaluate(&session.mapping);
        if readiness.is_blocked() {
            self.stage = Stage::Mapping(session);
            return Err(MappingError::Blocked(readiness));
        }
        self.generation += 1;
        self.last_error = None;
        let ticket = ProcessTicket {
            generation: self.generation,
            session_id: session.introspection.session_id.clone(),
            file: session.file.clone(),
            mapping: session.mapping.clone(),
        };
        info!(session = %ticket.session_id, mapped = ticket.mapping.len(), "submitted for processing");
        self.stage = Stage::Processing(session);
        Ok(ticket)
    }

    /// Feed back the outcome of processing.
    ///
    /// Only a result with `success = true` completes the flow. Anything else
    /// returns to mapping with the mapping untouched so it can be fixed and
    /// resubmitted without uploading again.
    pub fn complete_processing(
        &mut self,
        ticket: &ProcessTicket,
        outcome: Result<ProcessingResult, String>,
    ) -> Result<Phase, MappingError> {
        self.check_ticket(ticket.generation)?;
        let session = match std::mem::replace(&mut self.stage, Stage::Idle) {
            Stage::Processing(session) => session,
            other => {
                self.stage = other;
                return Err(self.already_completed(ticket.generation));
            }
        };
        match outcome {
            Ok(result) if result.success => {
                info!(
                    session = %session.introspection.session_id,
                    errors = result.errors.len(),
                    warnings = result.warnings.len(),
                    "processing completed"
                );
                self.stage = Stage::Completed { session, result };
            }
            Ok(result) => {
                let message = result.failure_message();
                warn!(session = %session.introspection.session_id, error = %message, "processing rejected");
                self.last_error = Some(message);
                self.stage = Stage::Mapping(session);
            }
            Err(message) => {
                warn!(session = %session.introspection.session_id, error = %message, "processing failed");
                self.last_error = Some(message);
                self.stage = Stage::Mapping(session);
            }
        }
        Ok(self.phase())
    }

    /// Drop everything and return to idle.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.last_error = None;
        self.stage = Stage::Idle;
        debug!(generation = self.generation, "reset");
    }

    pub fn file(&self) -> Option<&UploadedFile> {
        match &self.stage {
            Stage::Idle => None,
            Stage::Uploading(file) => Some(file),
            Stage::Mapping(session) | Stage::Processing(session) => Some(&session.file),
            Stage::Completed { session, .. } => Some(&session.file),
        }
    }

    pub fn introspection(&self) -> Option<&FileIntrospection> {
        self.session().map(|s| &s.introspection)
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.introspection().map(|i| &i.session_id)
    }

    pub fn mapping(&self) -> Option<&ColumnMapping> {
        self.session().map(|s| &s.mapping)
    }

    /// Completeness verdict for the current mapping, when there is one.
    pub fn readiness(&self) -> Option<Readiness> {
        self.mapping().map(Readiness::evaluate)
    }

    /// Result of the last successful processing call.
    pub fn result(&self) -> Option<&ProcessingResult> {
        match &self.stage {
            Stage::Completed { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Message from the last failed upload or processing call.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn session(&self) -> Option<&Session> {
        match &self.stage {
            Stage::Mapping(session) | Stage::Processing(session) => Some(session),
            Stage::Completed { session, .. } => Some(session),
            Stage::Idle | Stage::Uploading(_) => None,
        }
    }

    /// A ticket of the current generation whose response was already applied.
    fn already_completed(&self, generation: u64) -> MappingError {
        MappingError::StaleTicket {
            ticket: generation,
            current: self.generation,
        }
    }

    fn check_ticket(&self, generation: u64) -> Result<(), MappingError> {
        if generation == self.generation {
            Ok(())
        } else {
            debug!(ticket = generation, current = self.generation, "stale ticket");
            Err(MappingError::StaleTicket {
                ticket: generation,
                current: self.generation,
            })
        }
    }
}
