//! `ApiClient` against a local one-shot HTTP server.

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use equipment_visualizer::api::ApiClient;
use equipment_visualizer::config::AppConfig;
use equipment_visualizer::error::AppError;
use equipment_visualizer::models::User;
use equipment_visualizer::session::Session;
use equipment_visualizer::upload::UploadCandidate;

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(path).expect("Failed to read fixture")
}

/// One canned reply.
struct Reply {
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
}

impl Reply {
    fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.into().into_bytes(),
        }
    }

    fn bytes(status: u16, content_type: &'static str, body: &[u8]) -> Self {
        Self {
            status,
            content_type,
            body: body.to_vec(),
        }
    }
}

/// A request as the server saw it.
#[derive(Debug)]
struct Captured {
    request_line: String,
    /// Header lines, lowercased.
    headers: Vec<String>,
    body: String,
}

impl Captured {
    fn header(&self, name: &str) -> Option<String> {
        let prefix = format!("{}:", name.to_lowercase());
        self.headers
            .iter()
            .find(|h| h.starts_with(&prefix))
            .map(|h| h[prefix.len()..].trim().to_string())
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

async fn read_request(stream: &mut tokio::net::TcpStream) -> Captured {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
        let n = stream.read(&mut chunk).await.expect("read request");
        assert!(n > 0, "connection closed before headers");
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n").filter(|l| !l.is_empty());
    let request_line = lines.next().unwrap_or_default().to_string();
    let headers: Vec<String> = lines.map(|l| l.to_lowercase()).collect();

    let content_length = headers
        .iter()
        .find_map(|h| h.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok());
    let chunked = headers
        .iter()
        .any(|h| h.starts_with("transfer-encoding:") && h.contains("chunked"));

    loop {
        let body = &buf[header_end..];
        let done = match (content_length, chunked) {
            (Some(len), _) => body.len() >= len,
            (None, true) => body.ends_with(b"0\r\n\r\n"),
            (None, false) => true,
        };
        if done {
            break;
        }
        let n = stream.read(&mut chunk).await.expect("read body");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Captured {
        request_line,
        headers,
        body: String::from_utf8_lossy(&buf[header_end..]).to_string(),
    }
}

/// Serve `replies` in order, one connection each, and hand back what was
/// requested.
async fn serve(replies: Vec<Reply>) -> (String, JoinHandle<Vec<Captured>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let handle = tokio::spawn(async move {
        let mut seen = Vec::new();
        for reply in replies {
            let (mut stream, _) = listener.accept().await.expect("accept");
            seen.push(read_request(&mut stream).await);

            let head = format!(
                "HTTP/1.1 {} Test\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                reply.status,
                reply.content_type,
                reply.body.len()
            );
            stream.write_all(head.as_bytes()).await.expect("write head");
            stream.write_all(&reply.body).await.expect("write body");
            stream.shutdown().await.ok();
        }
        seen
    });

    (format!("http://{}/api", addr), handle)
}

fn client(base_url: &str, session: Session) -> ApiClient {
    ApiClient::new(&AppConfig::with_base_url(base_url), session).expect("valid base url")
}

fn signed_in() -> Session {
    let session = Session::in_memory();
    let user = User {
        id: Some(1),
        username: "alice".to_string(),
        email: None,
    };
    session.set_session("abc123", &user).expect("session stored");
    session
}

#[tokio::test]
async fn test_login_stores_session() {
    let (base, server) = serve(vec![Reply::json(200, fixture("login_response.json"))]).await;
    let session = Session::in_memory();
    let api = client(&base, session.clone());

    let auth = api.login("alice", "s3cret").await.expect("login succeeds");
    assert_eq!(auth.user.username, "alice");

    assert!(session.is_authenticated());
    assert_eq!(session.token().as_deref(), Some("9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b"));
    assert_eq!(session.username().as_deref(), Some("alice"));
    assert_eq!(session.current_user().map(|u| u.email), Some(Some("alice@example.com".to_string())));

    let seen = server.await.expect("server task");
    assert_eq!(seen[0].request_line, "POST /api/login/ HTTP/1.1");
    assert_eq!(seen[0].header("authorization"), None);
    let body: serde_json::Value = serde_json::from_str(&seen[0].body).expect("json body");
    assert_eq!(body, serde_json::json!({"username": "alice", "password": "s3cret"}));
}

#[tokio::test]
async fn test_rejected_login_carries_server_message() {
    let (base, server) = serve(vec![Reply::json(401, r#"{"error": "Invalid credentials"}"#)]).await;
    let session = Session::in_memory();
    let api = client(&base, session.clone());

    let err = api.login("alice", "wrong").await.unwrap_err();
    assert_eq!(err, AppError::Auth("Invalid credentials".to_string()));
    assert_eq!(err.server_message(), Some("Invalid credentials"));
    assert!(!session.is_authenticated());
    server.await.expect("server task");
}

#[tokio::test]
async fn test_login_without_token_is_refused() {
    let body = r#"{"token": "", "user": {"id": 1, "username": "alice"}}"#;
    let (base, server) = serve(vec![Reply::json(200, body)]).await;
    let session = Session::in_memory();
    let api = client(&base, session.clone());

    let err = api.login("alice", "s3cret").await.unwrap_err();
    assert!(matches!(err, AppError::Auth(_)), "{:?}", err);
    assert!(!session.is_authenticated());
    assert_eq!(session.username(), None);
    server.await.expect("server task");
}

#[tokio::test]
async fn test_register_without_email_sends_empty_string() {
    let (base, server) = serve(vec![Reply::json(201, fixture("login_response.json"))]).await;
    let session = Session::in_memory();
    let api = client(&base, session.clone());

    api.register("alice", None, "s3cret").await.expect("register succeeds");
    assert!(session.is_authenticated());

    let seen = server.await.expect("server task");
    assert_eq!(seen[0].request_line, "POST /api/register/ HTTP/1.1");
    let body: serde_json::Value = serde_json::from_str(&seen[0].body).expect("json body");
    assert_eq!(body["email"], "");
    assert_eq!(body["username"], "alice");
}

#[tokio::test]
async fn test_register_duplicate_user_is_auth_error() {
    let (base, server) = serve(vec![Reply::json(400, r#"{"error": "Username already exists"}"#)]).await;
    let api = client(&base, Session::in_memory());

    let err = api
        .register("alice", Some("alice@example.com"), "s3cret")
        .await
        .unwrap_err();
    assert_eq!(err, AppError::Auth("Username already exists".to_string()));
    server.await.expect("server task");
}

#[tokio::test]
async fn test_upload_sends_file_field_with_token() {
    let (base, server) = serve(vec![Reply::json(201, fixture("upload_response.json"))]).await;
    let api = client(&base, signed_in());

    let csv = "Equipment Name,Type,Flowrate,Pressure,Temperature\nPump-1,Pump,120,5.2,110\n";
    let file = UploadCandidate::new("equipment.csv", csv.as_bytes().to_vec());
    let summary = api.upload_csv(&file).await.expect("upload succeeds");
    assert_eq!(summary.id, 12);
    assert_eq!(summary.total_equipment, 15);

    let seen = server.await.expect("server task");
    let request = &seen[0];
    assert_eq!(request.request_line, "POST /api/upload-csv/ HTTP/1.1");
    assert_eq!(request.header("authorization").as_deref(), Some("token abc123"));
    assert!(request
        .header("content-type")
        .is_some_and(|ct| ct.starts_with("multipart/form-data")));
    assert!(
        request.body.contains(r#"name="file"; filename="equipment.csv""#),
        "{}",
        request.body
    );
    assert!(
        request.body.to_lowercase().contains("content-type: text/csv"),
        "{}",
        request.body
    );
    assert!(request.body.contains("Pump-1,Pump,120,5.2,110"));
}

#[tokio::test]
async fn test_upload_rejection_is_validation_error() {
    let body = r#"{"error": "Missing required columns: Pressure"}"#;
    let (base, server) = serve(vec![Reply::json(400, body)]).await;
    let api = client(&base, signed_in());

    let file = UploadCandidate::new("equipment.csv", b"a,b\n1,2\n".to_vec());
    let err = api.upload_csv(&file).await.unwrap_err();
    assert_eq!(err, AppError::Validation("Missing required columns: Pressure".to_string()));
    server.await.expect("server task");
}

#[tokio::test]
async fn test_history_server_error_is_network_error() {
    let (base, server) = serve(vec![Reply::bytes(500, "text/html", b"<h1>Server Error</h1>")]).await;
    let api = client(&base, signed_in());

    let err = api.upload_history().await.unwrap_err();
    assert!(matches!(err, AppError::Network(_)), "{:?}", err);
    assert_eq!(err.server_message(), None);
    server.await.expect("server task");
}

#[tokio::test]
async fn test_malformed_history_body_is_network_error() {
    let (base, server) = serve(vec![Reply::json(200, r#"{"not": "a list"}"#)]).await;
    let api = client(&base, signed_in());

    let err = api.upload_history().await.unwrap_err();
    assert!(matches!(err, AppError::Network(_)), "{:?}", err);
    server.await.expect("server task");
}

#[tokio::test]
async fn test_latest_dataset_loads_newest_summary() {
    let (base, server) = serve(vec![
        Reply::json(200, fixture("upload_history.json")),
        Reply::json(200, fixture("dataset_summary.json")),
    ])
    .await;
    let api = client(&base, signed_in());

    let latest = api.latest_dataset().await.expect("loads").expect("has a dataset");
    assert_eq!(latest.id, 9);
    assert_eq!(latest.equipment_records.len(), 3);

    let seen = server.await.expect("server task");
    assert_eq!(seen[0].request_line, "GET /api/upload-history/ HTTP/1.1");
    assert_eq!(seen[1].request_line, "GET /api/datasets/9/summary/ HTTP/1.1");
}

#[tokio::test]
async fn test_latest_dataset_with_empty_history() {
    let (base, server) = serve(vec![Reply::json(200, "[]")]).await;
    let api = client(&base, signed_in());

    assert_eq!(api.latest_dataset().await.expect("loads"), None);
    assert_eq!(server.await.expect("server task").len(), 1);
}

#[tokio::test]
async fn test_delete_accepts_empty_body() {
    let (base, server) = serve(vec![Reply::bytes(200, "application/json", b"")]).await;
    let api = client(&base, signed_in());

    api.delete_dataset(7).await.expect("delete succeeds");

    let seen = server.await.expect("server task");
    assert_eq!(seen[0].request_line, "DELETE /api/datasets/7/delete/ HTTP/1.1");
    assert_eq!(seen[0].header("authorization").as_deref(), Some("token abc123"));
}

#[tokio::test]
async fn test_delete_missing_dataset_is_not_found() {
    let (base, server) = serve(vec![Reply::json(404, r#"{"error": "Dataset not found"}"#)]).await;
    let api = client(&base, signed_in());

    let err = api.delete_dataset(99).await.unwrap_err();
    assert_eq!(err, AppError::NotFound("Dataset not found".to_string()));
    server.await.expect("server task");
}

#[tokio::test]
async fn test_download_pdf_returns_bytes_and_name() {
    let pdf = b"%PDF-1.4\n%fake report\n";
    let (base, server) = serve(vec![Reply::bytes(200, "application/pdf", pdf)]).await;
    let api = client(&base, signed_in());

    let report = api.download_pdf(9).await.expect("download succeeds");
    assert_eq!(report.file_name, "equipment_report_9.pdf");
    assert_eq!(report.bytes, pdf.to_vec());

    let seen = server.await.expect("server task");
    assert_eq!(seen[0].request_line, "GET /api/datasets/9/download-pdf/ HTTP/1.1");
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    // Bind then drop to get a port with nothing listening
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let api = client(&format!("http://{}/api", addr), signed_in());
    let err = api.upload_history().await.unwrap_err();
    assert!(matches!(err, AppError::Network(_)), "{:?}", err);
}
