use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use roster_core::{FlowError, UploadFlow};
use roster_gateway::{Gateway, GatewayError};
use roster_map::{MappingError, MappingPreset, Phase, SourceRejection, SuggestionEngine};
use roster_model::{
    CanonicalField, ColumnMapping, FileIntrospection, MatchingResults, MergeResult, MultiUpload,
    ProcessingResult, ProcessingStats, SampleFormat, SessionContext, SessionId, SourceKind,
    UploadedFile, UserRole,
};

/// Scripted gateway that records every call.
#[derive(Default)]
struct FakeGateway {
    uploads: Mutex<VecDeque<Result<FileIntrospection, GatewayError>>>,
    results: Mutex<VecDeque<Result<ProcessingResult, GatewayError>>>,
    calls: Mutex<Vec<String>>,
    submitted: Mutex<Vec<ColumnMapping>>,
    merges: Mutex<VecDeque<Result<MergeResult, GatewayError>>>,
    merge_sessions: Mutex<Vec<SessionId>>,
}

impl FakeGateway {
    fn with_upload(self, outcome: Result<FileIntrospection, GatewayError>) -> Self {
        self.uploads.lock().unwrap().push_back(outcome);
        self
    }

    fn with_result(self, outcome: Result<ProcessingResult, GatewayError>) -> Self {
        self.results.lock().unwrap().push_back(outcome);
        self
    }

    fn with_merge(self, outcome: Result<MergeResult, GatewayError>) -> Self {
        self.merges.lock().unwrap().push_back(outcome);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn upload_file(&self, file: &UploadedFile) -> roster_gateway::Result<FileIntrospection> {
        self.calls.lock().unwrap().push(format!("upload {}", file.name));
        self.uploads
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Network("no scripted upload".to_string())))
    }

    async fn process_data(
        &self,
        mapping: &ColumnMapping,
        session_id: &SessionId,
        _file: &UploadedFile,
    ) -> roster_gateway::Result<ProcessingResult> {
        self.calls.lock().unwrap().push(format!("process {session_id}"));
        self.submitted.lock().unwrap().push(mapping.clone());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Network("no scripted result".to_string())))
    }

    async fn sample_format(&self) -> roster_gateway::Result<SampleFormat> {
        self.calls.lock().unwrap().push("sample".to_string());
        Ok(SampleFormat {
            columns: vec!["student_id".to_string(), "name".to_string()],
            sample_rows: Vec::new(),
        })
    }

    async fn multi_upload(
        &self,
        upload: &MultiUpload,
        session_id: &SessionId,
    ) -> roster_gateway::Result<MergeResult> {
        let kinds: Vec<&str> = upload.iter().map(|(kind, _)| kind.id()).collect();
        self.calls.lock().unwrap().push(format!("multi {}", kinds.join("+")));
        self.merge_sessions.lock().unwrap().push(session_id.clone());
        self.merges
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Network("no scripted merge".to_string())))
    }
}

fn context() -> SessionContext {
    SessionContext::new(Some("coord".to_string()), UserRole::College, Some("gpj".to_string()))
}

fn csv(name: &str) -> UploadedFile {
    UploadedFile::new(name, 4096, name)
}

fn introspection() -> FileIntrospection {
    FileIntrospection {
        session_id: SessionId::from("sess-1".to_string()),
        filename: "roster.csv".to_string(),
        total_rows: 40,
        columns: ["Roll No", "Name", "Att%", "Marks", "Score"]
            .into_iter()
            .map(String::from)
            .collect(),
        suggestions: BTreeMap::from([
            ("Roll No".to_string(), CanonicalField::StudentId),
            ("Name".to_string(), CanonicalField::Name),
            ("Att%".to_string(), CanonicalField::AttendancePercentage),
        ]),
        sample_rows: Vec::new(),
    }
}

fn result(success: bool, errors: &[&str], warnings: &[&str]) -> ProcessingResult {
    ProcessingResult {
        success,
        stats: ProcessingStats {
            total_students: Some(40),
            high_risk_students: Some(6),
            ..ProcessingStats::default()
        },
        errors: errors.iter().map(|s| (*s).to_string()).collect(),
        warnings: warnings.iter().map(|s| (*s).to_string()).collect(),
    }
}

#[tokio::test]
async fn full_flow_succeeds() {
    let gateway = FakeGateway::default()
        .with_upload(Ok(introspection()))
        .with_result(Ok(result(true, &[], &["low confidence"])));
    let mut flow = UploadFlow::new(gateway, context());

    let phase = flow.select_and_upload(csv("roster.csv")).await.expect("upload");
    assert_eq!(phase, Phase::Mapping { ready: false });

    let readiness = flow
        .edit("Marks", Some(CanonicalField::Marks))
        .expect("edit");
    assert!(readiness.is_ready());

    let result = flow.submit_and_process().await.expect("process");
    assert_eq!(result.warnings, vec!["low confidence"]);
    assert_eq!(flow.machine().phase(), Phase::Completed);
    assert_eq!(
        flow.gateway().calls(),
        vec!["upload roster.csv".to_string(), "process sess-1".to_string()]
    );
    let submitted = flow.gateway().submitted.lock().unwrap().clone();
    assert_eq!(submitted[0].get("Marks"), Some(CanonicalField::Marks));
    assert_eq!(submitted[0].len(), 4);
}

#[tokio::test]
async fn rejected_file_never_reaches_gateway() {
    let mut flow = UploadFlow::new(FakeGateway::default(), context());
    let err = flow
        .select_and_upload(UploadedFile::new("notes.pdf", 10, "notes.pdf"))
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::Rejected(_)));
    assert_eq!(err.user_message(), "Please select a CSV or Excel file.");
    assert!(flow.gateway().calls().is_empty());
    assert_eq!(flow.machine().phase(), Phase::Idle);
}

#[tokio::test]
async fn upload_failure_returns_to_idle() {
    let gateway = FakeGateway::default().with_upload(Err(GatewayError::Http {
        status: 400,
        message: "Unsupported file format".to_string(),
    }));
    let mut flow = UploadFlow::new(gateway, context());

    let err = flow.select_and_upload(csv("roster.csv")).await.unwrap_err();
    assert!(matches!(err, FlowError::Upload(_)));
    assert_eq!(flow.machine().phase(), Phase::Idle);
    assert_eq!(flow.machine().last_error(), Some("Unsupported file format"));
}

#[tokio::test]
async fn blocked_mapping_is_not_submitted() {
    let gateway = FakeGateway::default().with_upload(Ok(introspection()));
    let mut flow = UploadFlow::new(gateway, context());
    flow.select_and_upload(csv("roster.csv")).await.expect("upload");

    let err = flow.submit_and_process().await.unwrap_err();
    assert!(matches!(err, FlowError::Mapping(MappingError::Blocked(_))));
    assert_eq!(
        err.user_message(),
        "Please map all required fields. Missing: marks"
    );
    assert_eq!(flow.gateway().calls(), vec!["upload roster.csv".to_string()]);
}

#[tokio::test]
async fn processing_failure_keeps_mapping_for_retry() {
    let gateway = FakeGateway::default()
        .with_upload(Ok(introspection()))
        .with_result(Ok(result(false, &["student_id column is empty"], &[])))
        .with_result(Err(GatewayError::Timeout("60s".to_string())))
        .with_result(Ok(result(true, &[], &[])));
    let mut flow = UploadFlow::new(gateway, context());
    flow.select_and_upload(csv("roster.csv")).await.expect("upload");
    flow.edit("Marks", Some(CanonicalField::Marks)).expect("edit");
    let mapping = flow.machine().mapping().cloned().expect("mapping");

    let err = flow.submit_and_process().await.unwrap_err();
    assert!(matches!(err, FlowError::ProcessingRejected(ref m) if m == "student_id column is empty"));
    assert_eq!(flow.machine().phase(), Phase::Mapping { ready: true });
    assert_eq!(flow.machine().mapping(), Some(&mapping));

    let err = flow.submit_and_process().await.unwrap_err();
    assert!(matches!(err, FlowError::Processing(GatewayError::Timeout(_))));
    assert!(err.user_message().contains("too long"));
    assert_eq!(flow.machine().mapping(), Some(&mapping));

    flow.submit_and_process().await.expect("third attempt");
    assert_eq!(flow.machine().phase(), Phase::Completed);
    assert_eq!(flow.gateway().calls().len(), 4);
}

#[tokio::test]
async fn preset_and_local_suggestions() {
    let gateway = FakeGateway::default().with_upload(Ok(introspection()));
    let mut flow = UploadFlow::new(gateway, context());
    flow.select_and_upload(csv("roster.csv")).await.expect("upload");

    let added = flow
        .apply_local_suggestions(&SuggestionEngine::new())
        .expect("suggest");
    assert_eq!(added, vec![("Marks".to_string(), CanonicalField::Marks)]);

    let preset = MappingPreset::new(
        [
            ("Marks".to_string(), CanonicalField::Marks),
            ("Dept".to_string(), CanonicalField::Department),
        ]
        .into_iter()
        .collect(),
    );
    let application = flow.apply_preset(&preset).expect("preset");
    assert_eq!(application.skipped, vec!["Dept".to_string()]);
    assert!(flow.machine().readiness().expect("readiness").is_ready());
}

#[tokio::test]
async fn sample_format_passes_through() {
    let flow = UploadFlow::new(FakeGateway::default(), context());
    let format = flow.sample_format().await.expect("format");
    assert_eq!(format.columns, vec!["student_id", "name"]);
}

fn merge(success: bool, message: &str) -> MergeResult {
    MergeResult {
        success,
        message: message.to_string(),
        uploaded_files: BTreeMap::new(),
        matching_results: MatchingResults {
            total_students: 12,
            perfect_matches: 9,
            partial_matches: 3,
            data_completeness: 75.0,
            multi_area_risk_count: 2,
        },
        stored_count: 12,
        session_id: SessionId::from("multi_upload_gpj_1".to_string()),
    }
}

#[tokio::test]
async fn multi_upload_merges_sources() {
    let gateway = FakeGateway::default().with_merge(Ok(merge(true, "Successfully processed 12 students")));
    let flow = UploadFlow::new(gateway, context());
    let upload = MultiUpload::new()
        .with(SourceKind::Marks, csv("marks.csv"))
        .with(SourceKind::Attendance, csv("attendance.xlsx"));

    let result = flow.multi_upload(&upload).await.expect("merge");
    assert_eq!(result.matching_results.perfect_matches, 9);
    assert_eq!(flow.gateway().calls(), vec!["multi attendance+marks".to_string()]);
    let sessions = flow.gateway().merge_sessions.lock().unwrap().clone();
    assert!(sessions[0].as_str().starts_with("multi_upload_gpj_"));
    assert_eq!(flow.machine().phase(), Phase::Idle);
}

#[tokio::test]
async fn rejected_sources_never_reach_gateway() {
    let flow = UploadFlow::new(FakeGateway::default(), context());

    let err = flow.multi_upload(&MultiUpload::new()).await.unwrap_err();
    assert!(matches!(err, FlowError::SourcesRejected(SourceRejection::NoFiles)));

    let upload = MultiUpload::new()
        .with(SourceKind::Attendance, csv("attendance.csv"))
        .with(SourceKind::Fees, UploadedFile::new("fees.docx", 10, "fees.docx"));
    let err = flow.multi_upload(&upload).await.unwrap_err();
    assert_eq!(err.user_message(), "fees file: Please select a CSV or Excel file.");
    assert!(flow.gateway().calls().is_empty());
}

#[tokio::test]
async fn multi_upload_failures_are_reported() {
    let gateway = FakeGateway::default()
        .with_merge(Err(GatewayError::Http {
            status: 500,
            message: "Processing failed: Missing required columns for marks: ['marks']".to_string(),
        }))
        .with_merge(Ok(merge(false, "")));
    let flow = UploadFlow::new(gateway, context());
    let upload = MultiUpload::new().with(SourceKind::Marks, csv("marks.csv"));

    let err = flow.multi_upload(&upload).await.unwrap_err();
    assert!(matches!(err, FlowError::MultiUpload(_)));
    assert!(err.user_message().contains("Missing required columns for marks"));

    let err = flow.multi_upload(&upload).await.unwrap_err();
    assert!(matches!(err, FlowError::ProcessingRejected(ref m) if m == "Failed to store data in system"));
}
