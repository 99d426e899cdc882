use std::path::Path;
use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewSurveyResponse, SurveyResponse};

const RESPONSE_COLUMNS: &str = "id, faculty, year, gender, knows_about_program, reads_emails, \
     interested_in_abroad, tried_applying, reason_not_applied, other_reason, family_support, \
     suggestions, created_at";

/// Opens (creating if needed) the SQLite database and applies migrations.
pub async fn init_db(database_url: &str, max_connections: u32) -> Result<SqlitePool, AppError> {
    info!("Initializing database at: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    if let Some(parent) = options.get_filename().parent() {
        ensure_dir(parent)?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    info!("Database initialized and migrations applied.");

    Ok(pool)
}

fn ensure_dir(dir: &Path) -> Result<(), AppError> {
    if !dir.as_os_str().is_empty() && !dir.exists() {
        info!("Creating database directory: {:?}", dir);
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

// --- Survey responses ---

pub async fn insert_survey_response(
    pool: &SqlitePool,
    response: &NewSurveyResponse,
) -> Result<SurveyResponse, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO survey_responses (
            id, faculty, year, gender, knows_about_program, reads_emails,
            interested_in_abroad, tried_applying, reason_not_applied, other_reason,
            family_support, suggestions, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {RESPONSE_COLUMNS}
        "#
    );
    let id = Uuid::new_v4().to_string();
    let created_at = Utc::now().timestamp();

    let stored = sqlx::query_as::<_, SurveyResponse>(&sql)
        .bind(&id)
        .bind(&response.faculty)
        .bind(&response.year)
        .bind(&response.gender)
        .bind(&response.knows_about_program)
        .bind(&response.reads_emails)
        .bind(&response.interested_in_abroad)
        .bind(&response.tried_applying)
        .bind(&response.reason_not_applied)
        .bind(&response.other_reason)
        .bind(&response.family_support)
        .bind(&response.suggestions)
        .bind(created_at)
        .fetch_one(pool)
        .await?;

    Ok(stored)
}

pub async fn get_survey_response(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<SurveyResponse>, sqlx::Error> {
    sqlx::query_as::<_, SurveyResponse>(&format!(
        "SELECT {RESPONSE_COLUMNS} FROM survey_responses WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn list_survey_responses(pool: &SqlitePool) -> Result<Vec<SurveyResponse>, sqlx::Error> {
    sqlx::query_as::<_, SurveyResponse>(&format!(
        "SELECT {RESPONSE_COLUMNS} FROM survey_responses ORDER BY created_at DESC, rowid DESC"
    ))
    .fetch_all(pool)
    .await
}

pub async fn count_survey_responses(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM survey_responses")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
