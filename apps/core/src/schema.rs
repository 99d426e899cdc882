//! Survey Validation Schema
//!
//! The authoritative shape of a valid survey response, expressed as an
//! ordered table of field rules. Every rule is checked independently and all
//! violations are reported together, so a single pass yields either a
//! normalized [`NewSurveyResponse`] or the full list of problems.
//!
//! Option sets (faculties, years, ...) are deliberately not enforced here:
//! any non-empty string is accepted for a required field.

use std::borrow::Cow;
use std::collections::HashMap;

use serde_json::{Map, Value};
use validator::{ValidationError, ValidationErrors};

use crate::models::NewSurveyResponse;

/// Message for any field whose JSON value is not a string.
pub const EXPECTED_STRING: &str = "Expected a string";

/// Message for a body that is valid JSON but not an object.
pub const EXPECTED_OBJECT: &str = "Expected a JSON object";

/// Key under which whole-payload errors are reported.
pub const SCHEMA_LEVEL: &str = "__all__";

const FIELD_REQUIRED: &str = "This field is required";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Must be a non-empty string; `message` is reported when it is absent or empty.
    Required { message: &'static str },
    /// May be absent or empty; if present it must still be a string.
    Optional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    /// JSON key as sent by the form client.
    pub name: &'static str,
    pub requirement: Requirement,
}

impl FieldRule {
    const fn required(name: &'static str, message: &'static str) -> Self {
        Self {
            name,
            requirement: Requirement::Required { message },
        }
    }

    const fn optional(name: &'static str) -> Self {
        Self {
            name,
            requirement: Requirement::Optional,
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self.requirement, Requirement::Required { .. })
    }

    /// Checks one raw value. `Ok(None)` means an optional field was left blank.
    pub fn check(&self, value: Option<&Value>) -> Result<Option<String>, ValidationError> {
        match (value, self.requirement) {
            (Some(Value::String(s)), _) if !s.is_empty() => Ok(Some(s.clone())),
            (Some(Value::String(_)) | None, Requirement::Required { message }) => {
                Err(violation("required", message))
            }
            (Some(Value::String(_)) | None, Requirement::Optional) => Ok(None),
            (Some(_), _) => Err(violation("type", EXPECTED_STRING)),
        }
    }
}

/// Field rules in record order.
pub const SURVEY_SCHEMA: [FieldRule; 11] = [
    FieldRule::required("faculty", "Please select your faculty"),
    FieldRule::required("year", "Please select your year"),
    FieldRule::optional("gender"),
    FieldRule::required("knowsAboutProgram", FIELD_REQUIRED),
    FieldRule::required("readsEmails", FIELD_REQUIRED),
    FieldRule::required("interestedInAbroad", FIELD_REQUIRED),
    FieldRule::required("triedApplying", FIELD_REQUIRED),
    FieldRule::optional("reasonNotApplied"),
    FieldRule::optional("otherReason"),
    FieldRule::required("familySupport", FIELD_REQUIRED),
    FieldRule::optional("suggestions"),
];

/// Names of the fields a submission cannot omit.
pub fn required_fields() -> impl Iterator<Item = &'static str> {
    SURVEY_SCHEMA
        .iter()
        .filter(|rule| rule.is_required())
        .map(|rule| rule.name)
}

pub fn rule(name: &str) -> Option<&'static FieldRule> {
    SURVEY_SCHEMA.iter().find(|rule| rule.name == name)
}

/// Validates a parsed request body.
///
/// Unknown keys are dropped. On failure every violated field is listed.
pub fn validate(input: &Value) -> Result<NewSurveyResponse, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let Some(object) = input.as_object() else {
        errors.add(SCHEMA_LEVEL, violation("type", EXPECTED_OBJECT));
        return Err(errors);
    };

    let mut accepted = HashMap::with_capacity(SURVEY_SCHEMA.len());
    for rule in SURVEY_SCHEMA.iter() {
        match rule.check(object.get(rule.name)) {
            Ok(Some(value)) => {
                accepted.insert(rule.name, value);
            }
            Ok(None) => {}
            Err(error) => errors.add(rule.name, error),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(normalize(accepted))
}

/// Convenience for callers holding a plain map (e.g. the form client).
pub fn validate_fields(
    fields: &Map<String, Value>,
) -> Result<NewSurveyResponse, ValidationErrors> {
    validate(&Value::Object(fields.clone()))
}

// Every required key is present in `accepted` once validation passed.
fn normalize(mut accepted: HashMap<&'static str, String>) -> NewSurveyResponse {
    let mut required = |name: &str| accepted.remove(name).unwrap_or_default();

    let faculty = required("faculty");
    let year = required("year");
    let knows_about_program = required("knowsAboutProgram");
    let reads_emails = required("readsEmails");
    let interested_in_abroad = required("interestedInAbroad");
    let tried_applying = required("triedApplying");
    let family_support = required("familySupport");

    NewSurveyResponse {
        faculty,
        year,
        gender: accepted.remove("gender"),
        knows_about_program,
        reads_emails,
        interested_in_abroad,
        tried_applying,
        reason_not_applied: accepted.remove("reasonNotApplied"),
        other_reason: accepted.remove("otherReason"),
        family_support,
        suggestions: accepted.remove("suggestions"),
    }
}

fn violation(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}
