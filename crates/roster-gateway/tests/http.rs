//! Gateway calls against a canned single-request HTTP server.

use std::time::Duration;

use roster_gateway::{Gateway, GatewayConfig, GatewayError, HttpGateway};
use roster_model::{CanonicalField, ColumnMapping, MultiUpload, SessionId, SourceKind, UploadedFile};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve one request with `status` and a JSON `body`; yields the raw request.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.expect("write");
        socket.shutdown().await.ok();
        request
    });
    (format!("http://{addr}/api"), handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.expect("read");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if request_complete(&buf) {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn request_complete(buf: &[u8]) -> bool {
    let text = String::from_utf8_lossy(buf);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let headers = text[..header_end].to_ascii_lowercase();
    let body_len = buf.len() - (header_end + 4);
    if let Some(line) = headers.lines().find(|l| l.starts_with("content-length:")) {
        let expected: usize = line["content-length:".len()..].trim().parse().unwrap_or(0);
        return body_len >= expected;
    }
    if headers.contains("transfer-encoding: chunked") {
        return text.ends_with("0\r\n\r\n");
    }
    true
}

fn temp_csv(dir: &tempfile::TempDir) -> UploadedFile {
    let path = dir.path().join("roster.csv");
    std::fs::write(&path, "Roll No,Name,Att%,Marks\nS1,Asha,91.5,78\n").expect("write csv");
    UploadedFile::from_path(&path).expect("metadata")
}

fn gateway(base_url: String) -> HttpGateway {
    HttpGateway::new(GatewayConfig::new(base_url).with_timeout(Duration::from_secs(5)))
        .expect("client")
}

#[tokio::test]
async fn upload_decodes_introspection() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"success": true, "session_id": "abc-123", "filename": "roster.csv", "total_rows": 1,
            "column_info": {"user_columns": ["Roll No", "Name", "Att%", "Marks"],
                            "suggestions": {"Roll No": "student_id", "Name": "name"}},
            "sample_data": [{"Roll No": "S1", "Name": "Asha", "Att%": 91.5, "Marks": 78}]}"#,
    )
    .await;
    let dir = tempfile::tempdir().expect("temp dir");
    let file = temp_csv(&dir);

    let introspection = gateway(url).upload_file(&file).await.expect("upload");
    assert_eq!(introspection.session_id.as_str(), "abc-123");
    assert_eq!(introspection.columns, vec!["Roll No", "Name", "Att%", "Marks"]);
    assert_eq!(introspection.suggestion_for("Roll No"), Some(CanonicalField::StudentId));
    assert_eq!(introspection.preview(3)[0], vec!["S1", "Asha", "91.5", "78"]);

    let request = server.await.expect("server");
    assert!(request.starts_with("POST /api/upload-file "));
    assert!(request.contains("name=\"file\"; filename=\"roster.csv\""));
    assert!(request.contains("S1,Asha,91.5,78"));
}

#[tokio::test]
async fn upload_keeps_numeric_headers() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"session_id": "x-9", "filename": "marks.xlsx", "total_rows": 1,
            "column_info": {"user_columns": ["Roll No", 2024], "suggestions": {}},
            "sample_data": [{"Roll No": "S1", "2024": 78}]}"#,
    )
    .await;
    let dir = tempfile::tempdir().expect("temp dir");
    let file = temp_csv(&dir);

    let introspection = gateway(url).upload_file(&file).await.expect("upload");
    assert_eq!(introspection.columns, vec!["Roll No", "2024"]);
    assert_eq!(introspection.preview(1)[0], vec!["S1", "78"]);
    server.await.expect("server");
}

#[tokio::test]
async fn multi_upload_sends_one_part_per_source() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"success": true, "message": "Successfully processed 2 students",
            "uploaded_files": {"attendance": "attendance.csv", "fees": "fees.csv"},
            "matching_results": {"total_students": 2, "perfect_matches": 0,
                                 "partial_matches": 2, "data_completeness": 0,
                                 "multi_area_risk_count": 1},
            "stored_count": 2, "session_id": "multi_upload_gpj_42"}"#,
    )
    .await;
    let dir = tempfile::tempdir().expect("temp dir");
    let attendance = dir.path().join("attendance.csv");
    std::fs::write(&attendance, "student_id,attendance_percentage\nS1,91\nS2,64\n").expect("write");
    let fees = dir.path().join("fees.csv");
    std::fs::write(&fees, "student_id,fees_paid,fees_due,payment_status\nS1,100,0,Paid\n")
        .expect("write");
    let upload = MultiUpload::new()
        .with(SourceKind::Fees, UploadedFile::from_path(&fees).expect("metadata"))
        .with(SourceKind::Attendance, UploadedFile::from_path(&attendance).expect("metadata"));

    let result = gateway(url)
        .multi_upload(&upload, &SessionId::for_multi_upload(Some("gpj"), 42))
        .await
        .expect("multi upload");
    assert!(result.success);
    assert_eq!(result.matching_results.partial_matches, 2);
    assert_eq!(result.stored_count, 2);

    let request = server.await.expect("server");
    assert!(request.starts_with("POST /api/multi-upload "));
    assert!(request.contains("name=\"attendance_file\"; filename=\"attendance.csv\""));
    assert!(request.contains("name=\"fees_file\"; filename=\"fees.csv\""));
    assert!(!request.contains("marks_file"));
    assert!(request.contains("multi_upload_gpj_42"));
}

#[tokio::test]
async fn process_sends_mapping_and_session() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"success": true, "message": "Data processed and saved successfully",
            "stats": {"total_students": 1, "high_risk_students": 0,
                      "ml_training": {"random_forest_accuracy": 0.873}},
            "validation": {"errors": [], "warnings": ["low confidence"]}}"#,
    )
    .await;
    let dir = tempfile::tempdir().expect("temp dir");
    let file = temp_csv(&dir);
    let mapping: ColumnMapping = [
        ("Roll No".to_string(), CanonicalField::StudentId),
        ("Marks".to_string(), CanonicalField::Marks),
    ]
    .into_iter()
    .collect();

    let result = gateway(url)
        .process_data(&mapping, &SessionId::from("abc-123".to_string()), &file)
        .await
        .expect("process");
    assert!(result.success);
    assert_eq!(result.stats.total_students, Some(1));
    assert_eq!(result.stats.accuracy_percent(), Some(87));
    assert_eq!(result.warnings, vec!["low confidence"]);

    let request = server.await.expect("server");
    assert!(request.starts_with("POST /api/process-data "));
    assert!(request.contains("name=\"mappings\""));
    assert!(request.contains(r#"{"Marks":"marks","Roll No":"student_id"}"#));
    assert!(request.contains("name=\"session_id\""));
    assert!(request.contains("abc-123"));
}

#[tokio::test]
async fn non_success_surfaces_detail() {
    let (url, server) = serve_once(
        "400 Bad Request",
        r#"{"detail": "Invalid session. Please upload the file again."}"#,
    )
    .await;

    let err = gateway(url).sample_format().await.unwrap_err();
    match err {
        GatewayError::Http { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid session. Please upload the file again.");
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
    server.await.expect("server");
}

#[tokio::test]
async fn missing_required_key_is_decode_error() {
    let (url, server) = serve_once("200 OK", r#"{"columns": ["student_id"]}"#).await;

    let err = gateway(url).sample_format().await.unwrap_err();
    assert!(matches!(err, GatewayError::Decode(_)), "got {err:?}");
    server.await.expect("server");
}

#[tokio::test]
async fn unknown_suggested_field_is_decode_error() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"session_id": "s", "filename": "roster.csv", "total_rows": 0,
            "column_info": {"user_columns": ["Roll No"], "suggestions": {"Roll No": "roll_number"}},
            "sample_data": []}"#,
    )
    .await;
    let dir = tempfile::tempdir().expect("temp dir");
    let file = temp_csv(&dir);

    let err = gateway(url).upload_file(&file).await.unwrap_err();
    assert!(matches!(err, GatewayError::Decode(_)), "got {err:?}");
    server.await.expect("server");
}

#[tokio::test]
async fn unreadable_file_fails_before_sending() {
    let file = UploadedFile::new("gone.csv", 10, "/nonexistent/dir/gone.csv");
    let err = HttpGateway::new(GatewayConfig::default())
        .expect("client")
        .upload_file(&file)
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Io(_)));
}
