//! Survey Submission Endpoint
//!
//! `POST /api/survey` is the only mutation the service exposes. The body is
//! read as raw bytes so that a malformed document, a wrong content type, an
//! oversized or truncated body and a schema violation all end up in the same
//! 400 reply.
//!
//! There is no idempotency key: a client that retries after a timeout may
//! create a second record for the same answers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use tracing::{error, field, info, instrument, warn, Span};

use crate::error::{field_messages, SubmissionError};
use crate::models::{SubmissionReceipt, SurveyResponse};
use crate::schema;
use crate::state::AppState;
use crate::store::SurveyStore;

pub const SURVEY_PATH: &str = "/api/survey";

#[instrument(skip_all, fields(body_len = field::Empty))]
pub async fn submit_survey(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let result = match body {
        Ok(body) => {
            Span::current().record("body_len", body.len());
            process_submission(state.store.as_ref(), &body).await
        }
        // Body limit exceeded or the stream broke off.
        Err(rejection) => Err(SubmissionError::MalformedInput(rejection.body_text())),
    };

    match result {
        Ok(stored) => {
            info!(id = %stored.id, "Survey response stored");
            (
                StatusCode::CREATED,
                Json(SubmissionReceipt::created(stored.id)),
            )
                .into_response()
        }
        Err(err) => {
            log_rejection(&err);
            err.into_response_with(state.expose_field_errors)
        }
    }
}

/// Parse, validate and persist one submission.
pub async fn process_submission(
    store: &dyn SurveyStore,
    body: &[u8],
) -> Result<SurveyResponse, SubmissionError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| SubmissionError::MalformedInput(e.to_string()))?;

    let record = schema::validate(&value).map_err(SubmissionError::ValidationFailed)?;

    store
        .insert(&record)
        .await
        .map_err(SubmissionError::PersistenceFailed)
}

fn log_rejection(err: &SubmissionError) {
    match err {
        SubmissionError::MalformedInput(reason) => {
            warn!(%reason, "Survey submission rejected: unreadable body");
        }
        SubmissionError::ValidationFailed(errors) => {
            warn!(
                fields = ?field_messages(errors),
                "Survey submission rejected: validation failed"
            );
        }
        SubmissionError::PersistenceFailed(cause) => {
            error!(error = %cause, "Survey submission could not be stored");
        }
    }
}
