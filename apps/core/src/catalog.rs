//! Question catalog for the multi-step survey form.
//!
//! Static question and option records. The server never checks answers
//! against these lists; they only drive what a client offers.

use serde::Serialize;

pub const FACULTIES: &[&str] = &[
    "Faculty of Arts & Humanities",
    "Faculty of Sciences",
    "Faculty of Engineering",
    "Faculty of Business & Economics",
    "Faculty of Law",
    "Faculty of Medicine",
    "Faculty of Social Sciences",
    "Other",
];

pub const YEARS: &[&str] = &["1st Year", "2nd Year", "3rd Year", "4th Year", "Postgraduate"];

pub const GENDERS: &[&str] = &["Male", "Female", "Non-binary", "Prefer not to say"];

pub const PROGRAM_AWARENESS: &[&str] = &["Yes", "No", "Unsure"];

pub const EMAIL_READING: &[&str] = &["Always", "Sometimes", "Rarely", "Never"];

/// How a question collects its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    /// Drop-down over a fixed option list.
    Select,
    /// One radio button per option.
    Choice,
    /// Free text.
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    /// Payload key the answer is stored under.
    pub field: &'static str,
    pub label: &'static str,
    pub kind: AnswerKind,
    pub options: &'static [&'static str],
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepDefinition {
    pub title: &'static str,
    pub questions: Vec<Question>,
}

impl StepDefinition {
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.questions.iter().map(|q| q.field)
    }
}

const fn question(
    field: &'static str,
    label: &'static str,
    kind: AnswerKind,
    options: &'static [&'static str],
    required: bool,
) -> Question {
    Question {
        field,
        label,
        kind,
        options,
        required,
    }
}

/// The four steps of the exchange survey, in presentation order.
pub fn default_steps() -> Vec<StepDefinition> {
    vec![
        StepDefinition {
            title: "Basic Information",
            questions: vec![
                question("faculty", "Faculty", AnswerKind::Select, FACULTIES, true),
                question("year", "Year of Study", AnswerKind::Select, YEARS, true),
                question("gender", "Gender", AnswerKind::Select, GENDERS, false),
            ],
        },
        StepDefinition {
            title: "Awareness",
            questions: vec![
                question(
                    "knowsAboutProgram",
                    "Were you aware of the student exchange program?",
                    AnswerKind::Choice,
                    PROGRAM_AWARENESS,
                    true,
                ),
                question(
                    "readsEmails",
                    "How often do you read university emails?",
                    AnswerKind::Choice,
                    EMAIL_READING,
                    true,
                ),
            ],
        },
        StepDefinition {
            title: "Interest",
            questions: vec![
                question(
                    "interestedInAbroad",
                    "Are you interested in studying abroad?",
                    AnswerKind::Text,
                    &[],
                    true,
                ),
                question(
                    "triedApplying",
                    "Have you ever tried applying?",
                    AnswerKind::Text,
                    &[],
                    true,
                ),
                question(
                    "reasonNotApplied",
                    "If not, what held you back?",
                    AnswerKind::Text,
                    &[],
                    false,
                ),
                question("otherReason", "Any other reason?", AnswerKind::Text, &[], false),
            ],
        },
        StepDefinition {
            title: "Support",
            questions: vec![
                question(
                    "familySupport",
                    "How does your family feel about you studying abroad?",
                    AnswerKind::Text,
                    &[],
                    true,
                ),
                question(
                    "suggestions",
                    "Suggestions for the program",
                    AnswerKind::Text,
                    &[],
                    false,
                ),
            ],
        },
    ]
}
