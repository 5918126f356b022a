use roster_gateway::GatewayError;
use roster_map::{FileRejection, MappingError, SourceRejection};
use thiserror::Error;

/// Why a step of the upload flow did not go through.
///
/// Every variant leaves the flow in an interactive state: a rejected file
/// keeps the previous session, a failed upload returns to idle, and a failed
/// processing call returns to mapping with the mapping kept.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("{0}")]
    Rejected(#[from] FileRejection),
    #[error("{0}")]
    SourcesRejected(#[from] SourceRejection),
    #[error(transparent)]
    Mapping(#[from] MappingError),
    #[error("upload failed: {0}")]
    Upload(#[source] GatewayError),
    #[error("processing failed: {0}")]
    Processing(#[source] GatewayError),
    #[error("multi-file upload failed: {0}")]
    MultiUpload(#[source] GatewayError),
    /// The backend answered but reported `success = false`.
    #[error("processing failed: {0}")]
    ProcessingRejected(String),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl FlowError {
    /// Text to show the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(rejection) => rejection.user_message().to_string(),
            Self::SourcesRejected(rejection) => rejection.user_message(),
            Self::Mapping(MappingError::Blocked(readiness)) => {
                format!("Please map all required fields. {readiness}")
            }
            Self::Mapping(err) => err.to_string(),
            Self::Upload(err)
            | Self::Processing(err)
            | Self::MultiUpload(err)
            | Self::Gateway(err) => {
                err.user_message().to_string()
            }
            Self::ProcessingRejected(message) => message.clone(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FlowError>;
