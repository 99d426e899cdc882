use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;

use crate::database;
use crate::error::AppError;
use crate::models::{NewSurveyResponse, SurveyResponse};

/// Defines the persistence seam used by the submission endpoint.
///
/// Implementations must store each call as one new record with a freshly
/// generated identifier. No deduplication is performed: the same answers
/// submitted twice become two records.
#[async_trait]
pub trait SurveyStore: Send + Sync + 'static {
    /// Atomically inserts one response and returns it with its new id.
    async fn insert(&self, response: &NewSurveyResponse) -> Result<SurveyResponse, AppError>;
}

/// SQLite-backed store.
#[derive(Clone)]
pub struct SqliteSurveyStore {
    pool: SqlitePool,
}

impl SqliteSurveyStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl SurveyStore for SqliteSurveyStore {
    async fn insert(&self, response: &NewSurveyResponse) -> Result<SurveyResponse, AppError> {
        Ok(database::insert_survey_response(&self.pool, response).await?)
    }
}
