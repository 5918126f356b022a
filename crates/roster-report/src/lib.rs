//! Reporting for roster ingestion.
//!
//! - **Processing report**: status, messages, and headline numbers derived
//!   from a processing result
//! - **Template export**: the backend's sample format written as CSV

mod error;
mod report;
mod template;

pub use error::{ReportError, Result};
pub use report::{Headline, MessageClass, Report, ReportMessage, ReportStatus, SUCCESS_MESSAGE, report};
pub use template::{DEFAULT_TEMPLATE_NAME, template_csv, write_template};
