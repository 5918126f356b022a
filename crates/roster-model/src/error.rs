use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown canonical field: {0}")]
    UnknownField(String),
    #[error("suggestion refers to a column the file does not have: {0}")]
    UnknownColumn(String),
    #[error("unknown source kind: {0} (expected attendance, marks, or fees)")]
    UnknownSource(String),
    #[error("unknown user role: {0}")]
    UnknownRole(String),
    #[error("file has no name: {0}")]
    MissingFileName(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
