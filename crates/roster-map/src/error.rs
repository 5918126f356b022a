//! Error types for mapping operations.

use std::fmt;

use crate::completeness::Readiness;
use crate::state::Phase;

/// Errors from driving the mapping state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// Column not found in the uploaded file.
    ColumnNotFound(String),
    /// The operation is not valid in the current phase.
    InvalidPhase { operation: &'static str, phase: Phase },
    /// Submission attempted while required fields are missing or duplicated.
    Blocked(Readiness),
    /// A response arrived for an upload or submission that was superseded.
    StaleTicket { ticket: u64, current: u64 },
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnNotFound(c) => write!(f, "Column not found: {c}"),
            Self::InvalidPhase { operation, phase } => {
                write!(f, "Cannot {operation} while {phase}")
            }
            Self::Blocked(readiness) => write!(f, "Mapping incomplete: {readiness}"),
            Self::StaleTicket { ticket, current } => {
                write!(f, "Ignoring stale response (generation {ticket}, current {current})")
            }
        }
    }
}

impl std::error::Error for MappingError {}
