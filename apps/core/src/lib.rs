//! Student Exchange Survey Backend
//!
//! Collects questionnaire answers from the exchange program's landing page.
//!
//! - `schema`: field rules deciding whether a submission is acceptable
//! - `routes` / `server`: the `POST /api/survey` endpoint and its HTTP stack
//! - `database` / `store`: SQLite persistence of accepted responses
//! - `form` / `client`: the multi-step form state machine and its submission client
//! - `catalog`: questions and option lists shown by the form

pub mod catalog;
pub mod client;
pub mod config;
pub mod database;
pub mod error;
pub mod form;
pub mod models;
pub mod routes;
pub mod schema;
pub mod server;
pub mod state;
pub mod store;
pub mod telemetry;

#[cfg(test)]
mod tests;
