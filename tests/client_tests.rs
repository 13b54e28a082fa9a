use std::path::PathBuf;

use pretty_assertions::assert_eq;
use reqwest::StatusCode;

use equipment_visualizer::api::{error_for_status, report_file_name, ApiClient, Endpoint};
use equipment_visualizer::config::{AppConfig, MAX_FILE_SIZE_BYTES};
use equipment_visualizer::error::AppError;
use equipment_visualizer::history::HistoryList;
use equipment_visualizer::models::{AuthResponse, DatasetSummary};
use equipment_visualizer::router::{Transition, View, ViewRouter};
use equipment_visualizer::session::Session;
use equipment_visualizer::upload::{UploadCandidate, UploadFlow, UploadPhase};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).expect("Failed to read fixture")
}

fn history_fixture() -> Vec<DatasetSummary> {
    serde_json::from_str(&read_fixture("upload_history.json")).expect("Failed to parse history")
}

#[test]
fn test_history_entries_derive_chart_from_equipment_types() {
    let history = history_fixture();
    assert_eq!(history.len(), 3);

    let newest = &history[0];
    assert!(newest.chart_data.is_none());
    let chart = newest.chart();
    assert_eq!(
        chart.labels,
        vec!["Pump", "Compressor", "Valve", "HeatExchanger", "Reactor", "Condenser"]
    );
    assert_eq!(chart.total(), newest.total_equipment as f64);
    assert_eq!(newest.uploaded_at_display(), "Jan 27, 2026, 10:30 AM");
}

#[test]
fn test_summary_prefers_sent_chart_data() {
    let summary: DatasetSummary =
        serde_json::from_str(&read_fixture("dataset_summary.json")).expect("Failed to parse summary");

    assert_eq!(summary.equipment_records.len(), 3);
    assert_eq!(summary.chart().labels, vec!["Pump", "Valve"]);
    assert_eq!(summary.chart().values, vec![2.0, 1.0]);
    assert_eq!(summary.distinct_types(), 2);
}

#[test]
fn test_upload_of_small_csv_reports_processed_counts() {
    let mut flow = UploadFlow::new(MAX_FILE_SIZE_BYTES);
    let file = UploadCandidate::new("equipment.csv", vec![b'x'; 8 * 1024]);
    assert_eq!(file.size_display(), "8.00 KB");

    flow.select(Some(file)).expect("8 KB csv should be accepted");
    let sent = flow.begin_upload().expect("upload should start");
    assert_eq!(sent.name, "equipment.csv");
    assert!(flow.is_uploading());

    let response: DatasetSummary =
        serde_json::from_str(&read_fixture("upload_response.json")).expect("Failed to parse upload response");
    let summary = flow.finish(Ok(response)).expect("summary is handed on");

    assert_eq!(summary.id, 12);
    assert_eq!(flow.phase(), UploadPhase::Success);
    assert_eq!(
        flow.success(),
        Some("Success! Processed 15 equipment records with 6 different types.")
    );
    assert!(flow.file().is_none());
}

#[test]
fn test_rejected_upload_shows_server_message() {
    let mut flow = UploadFlow::default();
    flow.select(Some(UploadCandidate::new("equipment.csv", b"a,b\n1,2\n".to_vec())))
        .unwrap();
    flow.begin_upload().unwrap();

    let err = error_for_status(
        Endpoint::UploadCsv,
        StatusCode::BAD_REQUEST,
        r#"{"error": "Missing required columns: Flowrate"}"#,
    );
    assert!(flow.finish(Err(err)).is_none());
    assert_eq!(flow.error(), Some("Missing required columns: Flowrate"));
    assert!(flow.file().is_some());
}

#[test]
fn test_delete_then_failed_delete_keeps_list() {
    let mut list = HistoryList::new(history_fixture());

    list.request_delete(7);
    assert_eq!(list.confirm_delete(), Some(7));
    list.delete_succeeded(7);
    let ids: Vec<u64> = list.datasets().iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![9, 4]);

    let err = error_for_status(Endpoint::DeleteDataset(99), StatusCode::NOT_FOUND, "");
    assert_eq!(err, AppError::NotFound("Dataset not found".to_string()));

    list.request_delete(99);
    assert_eq!(list.confirm_delete(), Some(99));
    list.delete_failed(99);
    let ids: Vec<u64> = list.datasets().iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![9, 4]);
    assert_eq!(list.pending_delete(), None);
    assert_eq!(list.in_flight(), None);
}

#[test]
fn test_search_narrows_history() {
    let mut list = HistoryList::new(history_fixture());
    list.set_search_term("7");
    let ids: Vec<u64> = list.filtered().iter().map(|d| d.id).collect();
    // id 7, and total_equipment 70 for dataset 4
    assert_eq!(ids, vec![7, 4]);

    list.set_search_term("nothing");
    assert!(list.filtered().is_empty());
    assert_eq!(list.count_label(), "3 datasets");
}

#[test]
fn test_login_logout_round_trip() {
    let session = Session::in_memory();
    let api = ApiClient::new(&AppConfig::with_base_url("http://localhost:8000/api"), session.clone())
        .expect("valid base url");
    let mut router = ViewRouter::default();
    router.apply(Transition::SessionChecked {
        authenticated: session.is_authenticated(),
    });
    assert_eq!(router.current(), View::Unauthenticated);

    let auth: AuthResponse =
        serde_json::from_str(&read_fixture("login_response.json")).expect("Failed to parse login response");
    session.set_session(&auth.token, &auth.user).expect("session stored");
    router.apply(Transition::LoggedIn);

    assert_eq!(router.current(), View::Dashboard);
    assert_eq!(session.username().as_deref(), Some("alice"));
    assert_eq!(session.current_user(), Some(auth.user.clone()));

    let request = api.request(Endpoint::UploadHistory).build().expect("request builds");
    assert_eq!(
        request.headers()["authorization"],
        "Token 9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b"
    );

    api.logout();
    router.apply(Transition::LoggedOut);
    assert!(!session.is_authenticated());
    assert_eq!(session.current_user(), None);
    assert_eq!(router.current(), View::Unauthenticated);

    let request = api.request(Endpoint::UploadHistory).build().expect("request builds");
    assert!(request.headers().get("authorization").is_none());
}

#[test]
fn test_report_download_name() {
    assert_eq!(report_file_name(9), "equipment_report_9.pdf");
    assert_eq!(
        ApiClient::new(&AppConfig::with_base_url("http://localhost:8000/api/"), Session::in_memory())
            .unwrap()
            .url(Endpoint::DownloadPdf(9)),
        "http://localhost:8000/api/datasets/9/download-pdf/"
    );
}
