use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A survey submission that passed validation but has not been stored yet.
///
/// Optional answers left empty by the respondent are `None`, never `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSurveyResponse {
    pub faculty: String,
    pub year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub knows_about_program: String,
    pub reads_emails: String,
    pub interested_in_abroad: String,
    pub tried_applying: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_not_applied: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_reason: Option<String>,
    pub family_support: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<String>,
}

/// Represents one stored questionnaire submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    /// The unique identifier for the response (UUID).
    pub id: String,
    pub faculty: String,
    pub year: String,
    pub gender: Option<String>,
    pub knows_about_program: String,
    pub reads_emails: String,
    pub interested_in_abroad: String,
    pub tried_applying: String,
    pub reason_not_applied: Option<String>,
    pub other_reason: Option<String>,
    pub family_support: String,
    pub suggestions: Option<String>,
    /// Unix timestamp of when the response was stored.
    pub created_at: i64,
}

impl SurveyResponse {
    /// Strips storage metadata, leaving the submitted answers.
    pub fn answers(&self) -> NewSurveyResponse {
        NewSurveyResponse {
            faculty: self.faculty.clone(),
            year: self.year.clone(),
            gender: self.gender.clone(),
            knows_about_program: self.knows_about_program.clone(),
            reads_emails: self.reads_emails.clone(),
            interested_in_abroad: self.interested_in_abroad.clone(),
            tried_applying: self.tried_applying.clone(),
            reason_not_applied: self.reason_not_applied.clone(),
            other_reason: self.other_reason.clone(),
            family_support: self.family_support.clone(),
            suggestions: self.suggestions.clone(),
        }
    }
}

/// Body of a `201 Created` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub success: bool,
    pub id: String,
}

impl SubmissionReceipt {
    pub fn created(id: impl Into<String>) -> Self {
        Self {
            success: true,
            id: id.into(),
        }
    }
}

/// Body of every non-2xx reply from the submission endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    /// Per-field messages, only present when the server is configured to expose them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, Vec<String>>>,
}

impl ErrorBody {
    pub fn new(error: &str) -> Self {
        Self {
            error: error.to_string(),
            fields: None,
        }
    }
}
