//! Error types for backend calls.

use thiserror::Error;

/// Errors that can occur while talking to the backend.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The request took longer than the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The backend answered with a non-2xx status.
    ///
    /// `message` is already the text to show: the body's `detail`, or
    /// `HTTP <status>: <reason>`.
    #[error("{message}")]
    Http {
        /// Status code of the response.
        status: u16,
        /// Message extracted from the response.
        message: String,
    },

    /// A 2xx body did not have the expected shape.
    #[error("unexpected response from server: {0}")]
    Decode(String),

    /// The selected file could not be read.
    #[error("I/O error: {0}")]
    Io(String),

    /// The HTTP client could not be built or the URL is unusable.
    #[error("invalid gateway configuration: {0}")]
    Config(String),
}

impl GatewayError {
    /// Returns a user-friendly error message suitable for display.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Network(_) => {
                "Could not connect to the server. Please check the API URL and your connection."
            }
            Self::Timeout(_) => "The server took too long to respond. Please try again.",
            Self::Http { message, .. } => message.as_str(),
            Self::Decode(_) => "The server sent a response this client does not understand.",
            Self::Io(_) => "Could not read the selected file.",
            Self::Config(_) => "The API URL is not valid.",
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if err.is_builder() {
            Self::Config(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<roster_model::ModelError> for GatewayError {
    fn from(err: roster_model::ModelError) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
