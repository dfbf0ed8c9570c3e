//! Download trigger through completion, against a local HTTP server.

use crate::model::TransferStatus;
use crate::provider::test_support::{numbered_records, FakeProvider};
use crate::provider::{LinkResolver, RowPolicy, SearchSession};
use crate::state::{AppEvent, AppState, StatusKind};
use crate::transfer::test_support::FakeTransfer;
use crate::transfer::{partial_path, ByteTransfer, HttpTransfer};
use crate::view::{AppServices, TuiApp};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::runtime::Handle;
use tokio::sync::Notify;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl_d() -> KeyEvent {
    KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL)
}

fn build_app(
    provider: FakeProvider,
    mirror: &str,
    transfer: Arc<dyn ByteTransfer>,
    download_dir: &Path,
) -> TuiApp<TestBackend> {
    let terminal = Terminal::new(TestBackend::new(160, 30)).unwrap();
    let services = AppServices {
        search: SearchSession::new(
            Arc::new(provider),
            LinkResolver::new(mirror),
            RowPolicy::default(),
        ),
        transfer,
    };
    TuiApp::new_for_test(
        terminal,
        AppState::new(250),
        services,
        Handle::current(),
        download_dir.to_path_buf(),
    )
}

async fn next_event(app: &mut TuiApp<TestBackend>) {
    let applied = tokio::time::timeout(Duration::from_secs(5), app.apply_next_event())
        .await
        .expect("background completion did not arrive");
    assert!(applied, "event channel closed");
}

async fn search_dune(app: &mut TuiApp<TestBackend>) {
    for ch in "dune".chars() {
        app.handle_key_test(key(KeyCode::Char(ch)));
    }
    app.handle_key_test(key(KeyCode::Enter));
    next_event(app).await;
}

fn row_status(app: &TuiApp<TestBackend>, index: usize) -> TransferStatus {
    app.app_state().table.rows()[index].status()
}

// ===== end to end over HTTP =====

#[tokio::test]
async fn download_marks_downloading_then_downloaded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1000/abc003/Book_3.epub"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"book bytes".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let transfer = Arc::new(HttpTransfer::new(reqwest::Client::new()));
    let mut app = build_app(
        FakeProvider::returning(numbered_records(53)),
        &server.uri(),
        transfer,
        dir.path(),
    );
    search_dune(&mut app).await;
    assert_eq!(row_status(&app, 0), TransferStatus::Empty);

    app.handle_key_test(ctrl_d());
    assert_eq!(row_status(&app, 0), TransferStatus::Downloading);
    assert_eq!(app.app_state().in_flight(), 1);

    next_event(&mut app).await;

    assert_eq!(row_status(&app, 0), TransferStatus::Downloaded);
    assert_eq!(app.app_state().in_flight(), 0);
    let saved = dir.path().join("Book_3.epub");
    assert_eq!(std::fs::read(&saved).unwrap(), b"book bytes");
    assert!(!partial_path(&saved).exists());
}

#[tokio::test]
async fn server_error_marks_failed_and_leaves_no_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let transfer = Arc::new(HttpTransfer::new(reqwest::Client::new()));
    let mut app = build_app(
        FakeProvider::returning(numbered_records(53)),
        &server.uri(),
        transfer,
        dir.path(),
    );
    search_dune(&mut app).await;

    app.handle_key_test(ctrl_d());
    next_event(&mut app).await;

    assert_eq!(row_status(&app, 0), TransferStatus::Failed);
    assert!(!dir.path().join("Book_3.epub").exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    let status = app.app_state().status.as_ref().unwrap();
    assert_eq!(status.kind, StatusKind::Error);
    assert!(status.text.contains("500"), "got {:?}", status.text);
}

#[tokio::test]
async fn failed_row_can_be_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let transfer = Arc::new(HttpTransfer::new(reqwest::Client::new()));
    let mut app = build_app(
        FakeProvider::returning(numbered_records(10)),
        &server.uri(),
        transfer,
        dir.path(),
    );
    search_dune(&mut app).await;

    app.handle_key_test(ctrl_d());
    next_event(&mut app).await;
    assert_eq!(row_status(&app, 0), TransferStatus::Failed);

    app.handle_key_test(ctrl_d());
    next_event(&mut app).await;
    assert_eq!(row_status(&app, 0), TransferStatus::Downloaded);
}

// ===== coordinator rules through the controller =====

#[tokio::test]
async fn second_trigger_on_downloading_row_starts_nothing() {
    let transfer = Arc::new(FakeTransfer::succeeding());
    let dir = TempDir::new().unwrap();
    let mut app = build_app(
        FakeProvider::returning(numbered_records(10)),
        "http://mirror.test/main/",
        transfer.clone(),
        dir.path(),
    );
    search_dune(&mut app).await;

    app.handle_key_test(ctrl_d());
    app.handle_key_test(ctrl_d());
    assert_eq!(app.app_state().in_flight(), 1);
    assert_eq!(app.app_state().status.as_ref().map(|s| s.kind), Some(StatusKind::Error));

    next_event(&mut app).await;
    tokio::task::yield_now().await;

    assert_eq!(transfer.calls(), 1);
    assert_eq!(app.drain_events_test(), 0);
    assert_eq!(row_status(&app, 0), TransferStatus::Downloaded);
}

#[tokio::test]
async fn different_rows_download_concurrently() {
    let transfer = Arc::new(FakeTransfer::succeeding());
    let dir = TempDir::new().unwrap();
    let mut app = build_app(
        FakeProvider::returning(numbered_records(10)),
        "http://mirror.test/main/",
        transfer.clone(),
        dir.path(),
    );
    search_dune(&mut app).await;

    app.handle_key_test(ctrl_d());
    app.handle_key_test(key(KeyCode::Down));
    app.handle_key_test(ctrl_d());
    assert_eq!(app.app_state().in_flight(), 2);

    next_event(&mut app).await;
    next_event(&mut app).await;

    assert_eq!(transfer.calls(), 2);
    assert_eq!(row_status(&app, 0), TransferStatus::Downloaded);
    assert_eq!(row_status(&app, 1), TransferStatus::Downloaded);
}

#[tokio::test]
async fn download_before_any_search_reports_message() {
    let transfer = Arc::new(FakeTransfer::succeeding());
    let dir = TempDir::new().unwrap();
    let mut app = build_app(
        FakeProvider::returning(vec![]),
        "http://mirror.test/main/",
        transfer.clone(),
        dir.path(),
    );

    app.handle_key_test(ctrl_d());

    let status = app.app_state().status.as_ref().unwrap();
    assert_eq!(status.kind, StatusKind::Error);
    assert!(status.text.contains("Search first"), "got {:?}", status.text);
    tokio::task::yield_now().await;
    assert_eq!(transfer.calls(), 0);
}

#[tokio::test]
async fn completion_for_replaced_result_set_is_discarded() {
    let transfer = Arc::new(FakeTransfer::succeeding());
    let dir = TempDir::new().unwrap();
    let mut app = build_app(
        FakeProvider::scripted(vec![Ok(numbered_records(10)), Ok(numbered_records(10))]),
        "http://mirror.test/main/",
        transfer,
        dir.path(),
    );
    search_dune(&mut app).await;
    let stale_tag = app.app_state().table.tag(0);

    app.handle_key_test(key(KeyCode::Enter));
    next_event(&mut app).await;
    assert_ne!(app.app_state().table.generation(), stale_tag.generation);

    app.handle_app_event_test(AppEvent::TransferCompleted {
        tag: stale_tag,
        outcome: Ok(PathBuf::from("Book_3.epub")),
    });

    assert_eq!(row_status(&app, 0), TransferStatus::Empty);
}

#[tokio::test]
async fn transfer_finishing_after_re_search_leaves_new_rows_alone() {
    let gate = Arc::new(Notify::new());
    let transfer = Arc::new(FakeTransfer::gated(gate.clone()));
    let dir = TempDir::new().unwrap();
    let mut app = build_app(
        FakeProvider::scripted(vec![Ok(numbered_records(10)), Ok(numbered_records(10))]),
        "http://mirror.test/main/",
        transfer.clone(),
        dir.path(),
    );
    search_dune(&mut app).await;
    let first_generation = app.app_state().table.generation();

    app.handle_key_test(ctrl_d());
    assert_eq!(row_status(&app, 0), TransferStatus::Downloading);
    app.handle_key_test(key(KeyCode::Enter));

    // The transfer is held, so the only completion available is the search.
    next_event(&mut app).await;
    assert_ne!(app.app_state().table.generation(), first_generation);
    assert_eq!(row_status(&app, 0), TransferStatus::Empty);
    assert_eq!(app.app_state().in_flight(), 1);

    gate.notify_one();
    next_event(&mut app).await;

    let state = app.app_state();
    assert_eq!(transfer.calls(), 1);
    assert_eq!(state.in_flight(), 0);
    assert!(state
        .table
        .rows()
        .iter()
        .all(|row| row.status() == TransferStatus::Empty));
    assert_eq!(state.status.as_ref().map(|s| s.text.as_str()), Some("7 results"));
}
