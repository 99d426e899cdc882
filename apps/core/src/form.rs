//! Multi-Step Survey Form
//!
//! Client-side state for the four-step questionnaire. Answers are written to
//! a single mapping as soon as they change and survive moving between steps.
//! Steps never block on missing answers: the server is the only place where
//! required fields are enforced.
//!
//! Submission is split in two so the transitions stay free of I/O:
//! [`SurveyForm::finalize`] hands out the payload and [`SurveyForm::complete`]
//! records what the server said. The outcome decides the final state:
//!
//! ```text
//! Editing --finalize--> Submitting --Created------> Submitted
//!                                  --Rejected-----> Rejected --retry--> Editing
//!                                  --Unreachable--> Failed   --retry--> Editing
//! any state --reset--> Editing (step 0, no answers)
//! ```

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};
use validator::ValidationErrors;

use crate::catalog::{self, StepDefinition};
use crate::client::{SubmissionOutcome, SurveyClient};
use crate::models::NewSurveyResponse;
use crate::schema;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    /// Answers can be changed and steps navigated.
    Editing,
    /// The payload has been handed out and the reply is pending.
    Submitting,
    /// Terminal: the server stored the response.
    Submitted { id: String },
    /// The server refused the data. Answers are kept for a retry.
    Rejected { status: u16, message: String },
    /// The server could not be reached. Answers are kept for a retry.
    Failed { reason: String },
}

impl FormStatus {
    fn label(&self) -> &'static str {
        match self {
            FormStatus::Editing => "editing",
            FormStatus::Submitting => "submitting",
            FormStatus::Submitted { .. } => "submitted",
            FormStatus::Rejected { .. } => "rejected",
            FormStatus::Failed { .. } => "failed",
        }
    }
}

impl From<SubmissionOutcome> for FormStatus {
    fn from(outcome: SubmissionOutcome) -> Self {
        match outcome {
            SubmissionOutcome::Created { id } => FormStatus::Submitted { id },
            SubmissionOutcome::Rejected { status, message } => {
                FormStatus::Rejected { status, message }
            }
            SubmissionOutcome::Unreachable { reason } => FormStatus::Failed { reason },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("A survey form needs at least one step")]
    NoSteps,
    #[error("The survey can only be submitted from the last step (on step {step} of {total})")]
    NotOnLastStep { step: usize, total: usize },
    #[error("The form is not editable while {0}")]
    NotEditing(&'static str),
    #[error("No submission is pending")]
    NotSubmitting,
    #[error("Only a rejected, failed or abandoned submission can be retried (form is {0})")]
    NotRetryable(&'static str),
}

#[derive(Debug, Clone)]
pub struct SurveyForm {
    steps: Vec<StepDefinition>,
    step: usize,
    fields: BTreeMap<String, String>,
    status: FormStatus,
}

impl Default for SurveyForm {
    fn default() -> Self {
        Self {
            steps: catalog::default_steps(),
            step: 0,
            fields: BTreeMap::new(),
            status: FormStatus::Editing,
        }
    }
}

impl SurveyForm {
    /// The standard four-step exchange survey.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_steps(steps: Vec<StepDefinition>) -> Result<Self, FormError> {
        if steps.is_empty() {
            return Err(FormError::NoSteps);
        }
        Ok(Self {
            steps,
            step: 0,
            fields: BTreeMap::new(),
            status: FormStatus::Editing,
        })
    }

    pub fn step_index(&self) -> usize {
        self.step
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn current_step(&self) -> &StepDefinition {
        &self.steps[self.step]
    }

    pub fn is_last_step(&self) -> bool {
        self.step + 1 == self.steps.len()
    }

    /// One-based position for "Step 2 of 4" style displays.
    pub fn progress(&self) -> (usize, usize) {
        (self.step + 1, self.steps.len())
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Records an answer immediately, whichever step it belongs to.
    pub fn set_field(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), FormError> {
        self.ensure_editing()?;
        self.fields.insert(name.into(), value.into());
        Ok(())
    }

    /// Moves to the next step. On the last step this is a no-op; use
    /// [`finalize`](Self::finalize) to submit.
    pub fn advance(&mut self) -> Result<usize, FormError> {
        self.ensure_editing()?;
        if !self.is_last_step() {
            self.step += 1;
            debug!("Survey form advanced to step {}", self.step);
        }
        Ok(self.step)
    }

    /// Moves back one step, keeping every answer. No-op on the first step.
    pub fn retreat(&mut self) -> Result<usize, FormError> {
        self.ensure_editing()?;
        self.step = self.step.saturating_sub(1);
        Ok(self.step)
    }

    /// Every recorded answer as the JSON object sent to the server.
    pub fn payload(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect()
    }

    /// Runs the server's validation rules locally. Purely informative: it
    /// never blocks navigation or submission.
    pub fn preview(&self) -> Result<NewSurveyResponse, ValidationErrors> {
        schema::validate_fields(&self.payload())
    }

    /// Hands out the payload and waits for [`complete`](Self::complete).
    pub fn finalize(&mut self) -> Result<Map<String, Value>, FormError> {
        self.ensure_editing()?;
        if !self.is_last_step() {
            return Err(FormError::NotOnLastStep {
                step: self.step + 1,
                total: self.steps.len(),
            });
        }
        self.status = FormStatus::Submitting;
        Ok(self.payload())
    }

    /// Applies the server's answer to a pending submission.
    pub fn complete(&mut self, outcome: SubmissionOutcome) -> Result<&FormStatus, FormError> {
        if self.status != FormStatus::Submitting {
            return Err(FormError::NotSubmitting);
        }
        self.status = outcome.into();
        info!("Survey form finished as {}", self.status.label());
        Ok(&self.status)
    }

    /// Finalizes, sends through `client` and completes in one go.
    ///
    /// Dropping the returned future before it resolves leaves the form in
    /// `Submitting`; [`retry`](Self::retry) reopens it.
    pub async fn submit(&mut self, client: &SurveyClient) -> Result<&FormStatus, FormError> {
        let payload = self.finalize()?;
        let outcome = client.submit(&payload).await;
        self.complete(outcome)
    }

    /// Reopens a rejected, failed or abandoned submission on the last step,
    /// answers intact. A submission is abandoned when it was finalized but
    /// never completed.
    pub fn retry(&mut self) -> Result<(), FormError> {
        match self.status {
            FormStatus::Submitting | FormStatus::Rejected { .. } | FormStatus::Failed { .. } => {
                self.status = FormStatus::Editing;
                self.step = self.steps.len() - 1;
                Ok(())
            }
            ref other => Err(FormError::NotRetryable(other.label())),
        }
    }

    /// Back to step 0 with no answers, from any state.
    pub fn reset(&mut self) {
        self.step = 0;
        self.fields.clear();
        self.status = FormStatus::Editing;
    }

    fn ensure_editing(&self) -> Result<(), FormError> {
        match self.status {
            FormStatus::Editing => Ok(()),
            ref other => Err(FormError::NotEditing(other.label())),
        }
    }
}
