//! Upload flow: the mapping state machine wired to a backend gateway.

pub mod error;
pub mod flow;

pub use error::{FlowError, Result};
pub use flow::UploadFlow;
