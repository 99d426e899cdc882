//! Form Flow Tests
//!
//! The multi-step form submitting through `SurveyClient` to a running server.

use std::sync::Arc;

use super::{create_test_db, spawn_app};
use crate::client::SurveyClient;
use crate::database;
use crate::form::{FormStatus, SurveyForm};
use crate::store::SqliteSurveyStore;

fn fill_all_steps(form: &mut SurveyForm) {
    form.set_field("faculty", "Faculty of Business & Economics").unwrap();
    form.set_field("year", "2nd Year").unwrap();
    form.advance().unwrap();
    form.set_field("knowsAboutProgram", "No").unwrap();
    form.set_field("readsEmails", "Rarely").unwrap();
    form.advance().unwrap();
    form.set_field("interestedInAbroad", "Very").unwrap();
    form.set_field("triedApplying", "No").unwrap();
    form.set_field("reasonNotApplied", "Costs").unwrap();
    form.advance().unwrap();
    form.set_field("familySupport", "Supportive").unwrap();
}

#[tokio::test]
async fn test_completed_form_is_stored() {
    let db = create_test_db().await;
    let base_url = spawn_app(Arc::new(SqliteSurveyStore::new(db.pool.clone())), false).await;
    let client = SurveyClient::new(&base_url).unwrap();

    let mut form = SurveyForm::new();
    fill_all_steps(&mut form);

    let status = form.submit(&client).await.unwrap().clone();

    let id = match status {
        FormStatus::Submitted { id } => id,
        other => panic!("Expected Submitted, got {:?}", other),
    };
    let stored = database::get_survey_response(&db.pool, &id)
        .await
        .unwrap()
        .expect("record should exist");
    assert_eq!(stored.faculty, "Faculty of Business & Economics");
    assert_eq!(stored.reason_not_applied.as_deref(), Some("Costs"));
    assert_eq!(stored.gender, None);
}

#[tokio::test]
async fn test_skipped_steps_are_sent_and_rejected_by_server() {
    let db = create_test_db().await;
    let base_url = spawn_app(Arc::new(SqliteSurveyStore::new(db.pool.clone())), false).await;
    let client = SurveyClient::new(&base_url).unwrap();

    let mut form = SurveyForm::new();
    form.set_field("faculty", "Faculty of Engineering").unwrap();
    for _ in 0..3 {
        form.advance().unwrap();
    }

    let payload = form.finalize().unwrap();
    assert_eq!(payload.len(), 1);
    assert!(payload.contains_key("faculty"));

    let outcome = client.submit(&payload).await;
    let status = form.complete(outcome).unwrap();

    assert_eq!(
        status,
        &FormStatus::Rejected {
            status: 400,
            message: "Invalid survey data".to_string()
        }
    );
    assert_eq!(database::count_survey_responses(&db.pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_retry_after_rejection_succeeds() {
    let db = create_test_db().await;
    let base_url = spawn_app(Arc::new(SqliteSurveyStore::new(db.pool.clone())), false).await;
    let client = SurveyClient::new(&base_url).unwrap();

    let mut form = SurveyForm::new();
    fill_all_steps(&mut form);
    form.set_field("familySupport", "").unwrap();

    assert!(matches!(
        form.submit(&client).await.unwrap(),
        FormStatus::Rejected { .. }
    ));

    form.retry().unwrap();
    form.set_field("familySupport", "Mixed").unwrap();

    assert!(matches!(
        form.submit(&client).await.unwrap(),
        FormStatus::Submitted { .. }
    ));
    assert_eq!(database::count_survey_responses(&db.pool).await.unwrap(), 1);
}

#[tokio::test]
async fn test_unreachable_server_is_not_reported_as_success() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let client = SurveyClient::new(&format!("http://127.0.0.1:{port}")).unwrap();

    let mut form = SurveyForm::new();
    fill_all_steps(&mut form);

    let status = form.submit(&client).await.unwrap();

    assert!(matches!(status, FormStatus::Failed { .. }));
    assert_eq!(form.field("faculty"), Some("Faculty of Business & Economics"));
}
