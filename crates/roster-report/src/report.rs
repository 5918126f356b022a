//! Outcome report for a processing result.

use std::fmt;

use roster_model::ProcessingResult;
use serde::Serialize;

/// Message shown when processing reported neither errors nor warnings.
pub const SUCCESS_MESSAGE: &str = "All data processed successfully";

/// Overall verdict of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Success,
    Warning,
    Error,
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageClass {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportMessage {
    pub class: MessageClass,
    pub text: String,
}

impl ReportMessage {
    fn new(class: MessageClass, text: impl Into<String>) -> Self {
        Self {
            class,
            text: text.into(),
        }
    }
}

/// Headline numbers of a processed upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Headline {
    pub processed: Option<u64>,
    pub high_risk: Option<u64>,
    /// Random forest accuracy, whole percent.
    pub accuracy_percent: Option<u32>,
}

impl Headline {
    /// Accuracy as shown to the user: `87%` or `N/A`.
    #[must_use]
    pub fn accuracy_label(&self) -> String {
        match self.accuracy_percent {
            Some(percent) => format!("{percent}%"),
            None => "N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub status: ReportStatus,
    /// Errors first, then warnings; a single success message when both are empty.
    pub messages: Vec<ReportMessage>,
    pub headline: Headline,
}

impl Report {
    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.of_class(MessageClass::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.of_class(MessageClass::Warning)
    }

    fn of_class(&self, class: MessageClass) -> impl Iterator<Item = &str> {
        self.messages
            .iter()
            .filter(move |m| m.class == class)
            .map(|m| m.text.as_str())
    }
}

/// Build the report for a processing result.
#[must_use]
pub fn report(result: &ProcessingResult) -> Report {
    let status = if !result.errors.is_empty() {
        ReportStatus::Error
    } else if !result.warnings.is_empty() {
        ReportStatus::Warning
    } else {
        ReportStatus::Success
    };

    let mut messages: Vec<ReportMessage> = result
        .errors
        .iter()
        .map(|e| ReportMessage::new(MessageClass::Error, e.as_str()))
        .chain(
            result
                .warnings
                .iter()
                .map(|w| ReportMessage::new(MessageClass::Warning, w.as_str())),
        )
        .collect();
    if messages.is_empty() {
        messages.push(ReportMessage::new(MessageClass::Success, SUCCESS_MESSAGE));
    }

    Report {
        status,
        messages,
        headline: Headline {
            processed: result.stats.total_students,
            high_risk: result.stats.high_risk_students,
            accuracy_percent: result.stats.accuracy_percent(),
        },
    }
}
