//! Test Module
//!
//! Cross-module tests for the survey backend.
//!
//! ## Test Categories
//! - `database_tests`: inserting and reading back survey responses
//! - `endpoint_tests`: `POST /api/survey` over a real listener
//! - `form_flow_tests`: the multi-step form submitting to a running server

pub mod form_flow_tests;

use std::sync::Arc;

use serde_json::{json, Value};
use sqlx::sqlite::SqlitePool;
use tempfile::TempDir;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::server::build_router;
use crate::state::AppState;
use crate::store::SurveyStore;

/// A migrated SQLite database living in its own temporary directory.
///
/// The directory is removed when this value is dropped, so keep it alive for
/// as long as the pool is used.
pub struct TestDb {
    pub pool: SqlitePool,
    _dir: TempDir,
}

pub async fn create_test_db() -> TestDb {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("survey_test.sqlite");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&db_url)
        .await
        .expect("Failed to create test pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    TestDb { pool, _dir: dir }
}

/// Serves the router on an ephemeral loopback port and returns its base URL.
pub async fn spawn_app(store: Arc<dyn SurveyStore>, expose_field_errors: bool) -> String {
    let config = Config {
        expose_field_errors,
        ..Config::default()
    };
    let app = build_router(AppState::new(store, &config), None).expect("Failed to build router");

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let address = listener.local_addr().expect("Listener has no address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });

    format!("http://{}", address)
}

/// The smallest payload the server accepts.
pub fn minimal_payload() -> Value {
    json!({
        "faculty": "Faculty of Engineering",
        "year": "3rd Year",
        "knowsAboutProgram": "Yes",
        "readsEmails": "Sometimes",
        "interestedInAbroad": "Yes",
        "triedApplying": "No",
        "familySupport": "Supportive"
    })
}
