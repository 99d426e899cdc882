use reqwest::StatusCode;
use serde_json::{Map, Value};
use tracing::{info, warn};
use url::Url;

use crate::error::AppError;
use crate::models::{ErrorBody, SubmissionReceipt};
use crate::routes::SURVEY_PATH;

/// What happened to one submission attempt, as seen from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The server stored the response under `id`.
    Created { id: String },
    /// The server answered but refused the data (or failed to store it).
    Rejected { status: u16, message: String },
    /// No usable answer: connection failure or an unreadable success body.
    Unreachable { reason: String },
}

/// Sends accumulated form answers to the submission endpoint.
///
/// No request timeout is configured beyond the transport's own defaults.
#[derive(Debug, Clone)]
pub struct SurveyClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl SurveyClient {
    /// `base_url` is where the server is mounted, e.g. `http://localhost:3000`
    /// or `https://example.edu/exchange`. A path prefix is kept, with or
    /// without a trailing slash.
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let dir = format!("{}/", base.path());
            base.set_path(&dir);
        }
        let endpoint = base.join(SURVEY_PATH.trim_start_matches('/'))?;
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn submit(&self, payload: &Map<String, Value>) -> SubmissionOutcome {
        let response = match self
            .http
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Survey submission did not reach {}: {}", self.endpoint, e);
                return SubmissionOutcome::Unreachable {
                    reason: e.to_string(),
                };
            }
        };

        let status = response.status();
        if status == StatusCode::CREATED {
            return match response.json::<SubmissionReceipt>().await {
                Ok(receipt) if receipt.success && !receipt.id.is_empty() => {
                    info!("Survey submission accepted with id {}", receipt.id);
                    SubmissionOutcome::Created { id: receipt.id }
                }
                Ok(_) => SubmissionOutcome::Unreachable {
                    reason: "Server acknowledged the submission without an id".to_string(),
                },
                Err(e) => SubmissionOutcome::Unreachable {
                    reason: format!("Unreadable submission receipt: {}", e),
                },
            };
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or_else(|_| {
                if text.is_empty() {
                    status.canonical_reason().unwrap_or("Unknown error").to_string()
                } else {
                    text
                }
            });

        warn!("Survey submission rejected with status {}: {}", status, message);
        SubmissionOutcome::Rejected {
            status: status.as_u16(),
            message,
        }
    }
}
