use roster_map::Readiness;
use roster_model::MergeResult;
use roster_report::{Report, ReportStatus};

/// How an `upload` run ended.
#[derive(Debug)]
pub enum UploadOutcome {
    /// The file failed the extension or size check.
    Rejected(String),
    UploadFailed(String),
    /// Required fields are missing or duplicated.
    Blocked(Readiness),
    DryRun { ready: bool },
    ProcessingFailed(String),
    Processed(Report),
    /// Multi-source files merged and stored.
    Merged(MergeResult),
}

impl UploadOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Processed(report) if report.status != ReportStatus::Error => 0,
            Self::DryRun { ready: true } | Self::Merged(_) => 0,
            _ => 1,
        }
    }
}
