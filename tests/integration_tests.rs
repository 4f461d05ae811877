//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: CSV workbook → batched POSTs → log worksheet

use serde_json::json;
use sheet_ingest::config::IngestConfig;
use sheet_ingest::http::{IngestClient, INGEST_PATH, NO_CONTENT_MESSAGE};
use sheet_ingest::uploader;
use sheet_ingest::workbook::{CsvWorkbook, Workbook};
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

/// Workbook directory with a `Sheet1.csv` holding a header and `rows` tickets
fn workbook_with_rows(rows: usize) -> TempDir {
    let dir = TempDir::new().unwrap();
    let mut csv = String::from("ticket,timestamp,closed,category,solution,content\n");
    for i in 1..=rows {
        csv.push_str(&format!(
            "T-{i},2024-01-0{d},,Hardware,\"Replaced, tested\",Ticket {i}\n",
            d = i % 9 + 1
        ));
    }
    fs::write(dir.path().join("Sheet1.csv"), csv).unwrap();
    dir
}

fn config_for(dir: &TempDir, server: &MockServer, batch_size: usize) -> IngestConfig {
    let mut config = IngestConfig::default();
    config.workbook = dir.path().to_path_buf();
    config.batch_size = batch_size;
    config.destination.api_token = "dt0c01.integration".to_string();
    config.destination.endpoint = Some(format!("{}{INGEST_PATH}", server.uri()));
    config.validate().unwrap();
    config
}

fn read_log(dir: &TempDir) -> Vec<Vec<String>> {
    CsvWorkbook::open(dir.path())
        .unwrap()
        .worksheet("Logs")
        .unwrap()
        .expect("log worksheet written")
        .cells()
        .clone()
}

// ============================================================================
// End-to-end Tests
// ============================================================================

#[tokio::test]
async fn test_uploads_all_rows_in_batches() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(INGEST_PATH))
        .and(header("Authorization", "Api-Token dt0c01.integration"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(204))
        .expect(3)
        .mount(&server)
        .await;

    let dir = workbook_with_rows(5);
    let config = config_for(&dir, &server, 2);
    let mut workbook = CsvWorkbook::open(dir.path()).unwrap();
    let client = IngestClient::with_config(config.client_config().unwrap()).unwrap();

    let report = uploader::run(&config, &mut workbook, &client).await.unwrap();

    assert!(report.found_data);
    assert_eq!(report.table_rows, 5);
    assert_eq!(report.summary.batches, 3);
    assert_eq!(report.summary.records_sent, 5);
    assert_eq!(report.summary.failed_batches, 0);

    let log = read_log(&dir);
    assert_eq!(log.len(), 4);
    assert_eq!(log[0][0], "Start Time");
    assert_eq!(log[0][8], "Response Message");
    assert_eq!(&log[1][4..8], ["1", "2", "2", "204"]);
    assert_eq!(&log[3][4..8], ["5", "5", "1", "204"]);
    assert_eq!(log[3][8], NO_CONTENT_MESSAGE);
    assert!(log[1][2].ends_with(" ms"));
    assert!(log[1][3].ends_with("bytes") || log[1][3].ends_with("KiB"));
}

#[tokio::test]
async fn test_records_carry_positional_fields_and_source_tag() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(INGEST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": {"code": 200, "message": "ok"}
        })))
        .mount(&server)
        .await;

    let dir = workbook_with_rows(1);
    let config = config_for(&dir, &server, 10);
    let mut workbook = CsvWorkbook::open(dir.path()).unwrap();
    let client = IngestClient::with_config(config.client_config().unwrap()).unwrap();

    uploader::run(&config, &mut workbook, &client).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        body,
        json!([{
            "smax.ticketid": "T-1",
            "smax.timestamp": "2024-01-02",
            "smax.closedtime": "",
            "smax.category": "Hardware",
            "smax.solution": "Replaced, tested",
            "content": "Ticket 1",
            "log.source": "SMAXTickets"
        }])
    );

    let log = read_log(&dir);
    assert_eq!(log[1][7], "200");
    assert_eq!(log[1][8], "ok");
}

#[tokio::test]
async fn test_failed_batch_is_logged_and_run_continues() {
    let server = MockServer::start().await;

    // First request fails, second succeeds
    Mock::given(method("POST"))
        .and(path(INGEST_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "Max payload size exceeded"}
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(INGEST_PATH))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let dir = workbook_with_rows(4);
    let config = config_for(&dir, &server, 2);
    let mut workbook = CsvWorkbook::open(dir.path()).unwrap();
    let client = IngestClient::with_config(config.client_config().unwrap()).unwrap();

    let report = uploader::run(&config, &mut workbook, &client).await.unwrap();

    assert_eq!(report.summary.batches, 2);
    assert_eq!(report.summary.failed_batches, 1);
    assert_eq!(report.summary.records_sent, 2);

    let log = read_log(&dir);
    assert_eq!(log.len(), 3);
    assert_eq!(log[1][7], "400");
    assert_eq!(log[1][8], "HTTP 400: Max payload size exceeded");
    assert_eq!(log[2][7], "204");
}

#[tokio::test]
async fn test_unreachable_endpoint_logs_zero_code_per_batch() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let dir = workbook_with_rows(3);
    let mut config = IngestConfig::default();
    config.workbook = dir.path().to_path_buf();
    config.batch_size = 2;
    config.destination.api_token = "t".to_string();
    config.destination.endpoint = Some(format!("http://127.0.0.1:{port}{INGEST_PATH}"));

    let mut workbook = CsvWorkbook::open(dir.path()).unwrap();
    let client = IngestClient::with_config(config.client_config().unwrap()).unwrap();

    let report = uploader::run(&config, &mut workbook, &client).await.unwrap();

    assert_eq!(report.summary.batches, 2);
    assert_eq!(report.summary.failed_batches, 2);

    let log = read_log(&dir);
    assert_eq!(log.len(), 3);
    for row in &log[1..] {
        assert_eq!(row[7], "0");
        assert!(row[8].starts_with("HTTP request failed"));
    }
}

#[tokio::test]
async fn test_missing_data_sheet_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, &server, 10);
    let mut workbook = CsvWorkbook::open(dir.path()).unwrap();
    let client = IngestClient::with_config(config.client_config().unwrap()).unwrap();

    let report = uploader::run(&config, &mut workbook, &client).await.unwrap();

    assert!(!report.found_data);
    assert!(!dir.path().join("Logs.csv").exists());
}

#[tokio::test]
async fn test_start_and_max_items_select_a_window() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;

    let dir = workbook_with_rows(10);
    let mut config = config_for(&dir, &server, 3);
    config.item_start = 4;
    config.max_items = 5;

    let mut workbook = CsvWorkbook::open(dir.path()).unwrap();
    let client = IngestClient::with_config(config.client_config().unwrap()).unwrap();

    uploader::run(&config, &mut workbook, &client).await.unwrap();

    let log = read_log(&dir);
    assert_eq!(&log[1][4..7], ["4", "6", "3"]);
    assert_eq!(&log[2][4..7], ["7", "8", "2"]);
}
