// Exchange Survey Backend Entry Point

use exchange_survey_core::config::Config;
use exchange_survey_core::{server, telemetry};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::bootstrap(telemetry::init_tracing)?;

    info!(
        "Starting exchange survey backend (field errors exposed: {})",
        config.expose_field_errors
    );

    if let Err(e) = server::run(config).await {
        error!("Server stopped with an error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
