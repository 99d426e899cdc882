use std::sync::Arc;
use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::Config;
use crate::database;
use crate::error::AppError;
use crate::routes::{submit_survey, SURVEY_PATH};
use crate::state::AppState;
use crate::store::SqliteSurveyStore;

/// Builds the HTTP router around an already constructed state.
pub fn build_router(
    state: Arc<AppState>,
    allowed_origin: Option<&str>,
) -> Result<Router, AppError> {
    let origin = match allowed_origin {
        Some(origin) => AllowOrigin::exact(
            HeaderValue::from_str(origin)
                .map_err(|e| AppError::Config(format!("Invalid allowed origin '{origin}': {e}")))?,
        ),
        None => AllowOrigin::any(),
    };

    let cors = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(origin)
        .max_age(Duration::from_secs(60 * 60));

    Ok(Router::new()
        .route(SURVEY_PATH, post(submit_survey))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}

/// Opens the database, binds the listener and serves until a shutdown signal.
pub async fn run(config: Config) -> Result<(), AppError> {
    info!("Initializing state...");
    let pool = database::init_db(&config.database_url, config.max_connections).await?;

    let on_record = database::count_survey_responses(&pool).await?;
    info!("{on_record} survey responses on record");

    let store = Arc::new(SqliteSurveyStore::new(pool));
    let state = AppState::new(store, &config);
    let app = build_router(state, config.allowed_origin.as_deref())?;

    let address = config.bind_address();
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
