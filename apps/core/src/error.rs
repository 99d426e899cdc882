use std::collections::BTreeMap;
use std::io;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::models::ErrorBody;

/// Body message for every rejected submission, whatever the cause.
pub const INVALID_SURVEY_DATA: &str = "Invalid survey data";

/// Body message when a valid submission could not be stored.
pub const PERSISTENCE_FAILED: &str = "Failed to save survey response";

/// Application-wide error type, consolidating all possible errors into a single enum.
#[derive(Debug, Error)]
pub enum AppError {
    /// Represents errors originating from the database, typically from `sqlx`.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents failures while applying schema migrations.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Represents data validation errors (e.g., invalid input format).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration-related errors (e.g., unparseable environment variables).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents unexpected internal errors that indicate a bug.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Config(format!("URL parse error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Io(io::Error::other(format!("HTTP error: {}", err)))
    }
}

/// Why a `POST /api/survey` request was turned down.
///
/// The variants stay distinct internally so operators can tell them apart in
/// the logs, while the two client-side causes share one response shape.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The request body was not parseable JSON.
    #[error("Malformed JSON body: {0}")]
    MalformedInput(String),

    /// The body parsed but broke one or more field rules.
    #[error("Survey validation failed: {0}")]
    ValidationFailed(ValidationErrors),

    /// The record passed validation but the store refused it.
    #[error("Failed to persist survey response: {0}")]
    PersistenceFailed(#[source] AppError),
}

impl SubmissionError {
    pub fn status(&self) -> StatusCode {
        match self {
            SubmissionError::MalformedInput(_) | SubmissionError::ValidationFailed(_) => {
                StatusCode::BAD_REQUEST
            }
            SubmissionError::PersistenceFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Builds the wire body. Per-field messages are only attached when
    /// `expose_fields` is set and the failure was a schema violation.
    pub fn body(&self, expose_fields: bool) -> ErrorBody {
        match self {
            SubmissionError::MalformedInput(_) => ErrorBody::new(INVALID_SURVEY_DATA),
            SubmissionError::ValidationFailed(errors) => {
                let mut body = ErrorBody::new(INVALID_SURVEY_DATA);
                if expose_fields {
                    body.fields = Some(field_messages(errors));
                }
                body
            }
            SubmissionError::PersistenceFailed(_) => ErrorBody::new(PERSISTENCE_FAILED),
        }
    }

    pub fn into_response_with(self, expose_fields: bool) -> Response {
        (self.status(), Json(self.body(expose_fields))).into_response()
    }
}

impl IntoResponse for SubmissionError {
    fn into_response(self) -> Response {
        self.into_response_with(false)
    }
}

/// Flattens validator errors into `field -> [messages]`, falling back to the
/// error code when a rule carries no message.
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}
