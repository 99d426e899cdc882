use std::env;
use std::fmt::Display;
use std::str::FromStr;

use tracing::{info, warn};
use validator::Validate;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: &str = "3000";
const DEFAULT_DATABASE_URL: &str = "sqlite://data/survey.sqlite";
const DEFAULT_MAX_CONNECTIONS: &str = "5";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    /// Bunyan-style JSON lines.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" | "bunyan" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Runtime settings for the survey server, read from the environment.
#[derive(Debug, Clone, Validate)]
pub struct Config {
    #[validate(length(min = 1))]
    pub host: String,
    pub port: u16,
    #[validate(length(min = 1))]
    pub database_url: String,
    #[validate(range(min = 1))]
    pub max_connections: u32,
    /// Attach per-field messages to 400 replies.
    pub expose_field_errors: bool,
    /// CORS origin; `None` allows any.
    pub allowed_origin: Option<String>,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: 3000,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 5,
            expose_field_errors: false,
            allowed_origin: None,
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Reads `.env` (if any), hands the log format to `init_logging`, then
    /// loads the remaining settings.
    ///
    /// Logging is installed before any other variable is parsed so that
    /// fallbacks to defaults and rejected values show up in the log.
    pub fn bootstrap<F>(init_logging: F) -> Result<Self, AppError>
    where
        F: FnOnce(LogFormat) -> Result<(), AppError>,
    {
        let env_file = dotenv::dotenv();
        init_logging(log_format_from_env()?)?;

        match env_file {
            Ok(path) => info!("Loaded environment from {}", path.display()),
            Err(e) => info!("No .env file loaded: {}", e),
        }
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, AppError> {
        let config = Self {
            host: try_load("SURVEY_HOST", DEFAULT_HOST)?,
            port: try_load("SURVEY_PORT", DEFAULT_PORT)?,
            database_url: try_load("DATABASE_URL", DEFAULT_DATABASE_URL)?,
            max_connections: try_load("SURVEY_DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            expose_field_errors: try_load("SURVEY_EXPOSE_FIELD_ERRORS", "false")?,
            allowed_origin: var("SURVEY_ALLOWED_ORIGIN").filter(|s| !s.is_empty()),
            log_format: try_load("SURVEY_LOG_FORMAT", "pretty")?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `SURVEY_LOG_FORMAT` on its own, without logging. Used before a
/// subscriber exists.
pub fn log_format_from_env() -> Result<LogFormat, AppError> {
    match var("SURVEY_LOG_FORMAT") {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("SURVEY_LOG_FORMAT={raw}: {e}"))),
        None => Ok(LogFormat::Pretty),
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, AppError>
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim().parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        AppError::Config(format!("{key}={raw}: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [&str; 7] = [
        "SURVEY_HOST",
        "SURVEY_PORT",
        "DATABASE_URL",
        "SURVEY_DB_MAX_CONNECTIONS",
        "SURVEY_EXPOSE_FIELD_ERRORS",
        "SURVEY_ALLOWED_ORIGIN",
        "SURVEY_LOG_FORMAT",
    ];

    fn cleared() -> Vec<(&'static str, Option<&'static str>)> {
        KEYS.iter().map(|k| (*k, None)).collect()
    }

    #[test]
    fn test_defaults_when_unset() {
        temp_env::with_vars(cleared(), || {
            let config = Config::from_env().expect("defaults should load");
            let default = Config::default();

            assert_eq!(config.port, default.port);
            assert_eq!(config.database_url, default.database_url);
            assert_eq!(config.max_connections, 5);
            assert!(!config.expose_field_errors);
            assert_eq!(config.allowed_origin, None);
            assert_eq!(config.log_format, LogFormat::Pretty);
            assert_eq!(config.bind_address(), "0.0.0.0:3000");
        });
    }

    #[test]
    fn test_overrides_are_applied() {
        let mut vars = cleared();
        vars.extend([
            ("SURVEY_PORT", Some("8080")),
            ("DATABASE_URL", Some("sqlite::memory:")),
            ("SURVEY_EXPOSE_FIELD_ERRORS", Some("true")),
            ("SURVEY_ALLOWED_ORIGIN", Some("https://exchange.example.edu")),
            ("SURVEY_LOG_FORMAT", Some("json")),
        ]);

        temp_env::with_vars(vars, || {
            let config = Config::from_env().unwrap();

            assert_eq!(config.port, 8080);
            assert_eq!(config.database_url, "sqlite::memory:");
            assert!(config.expose_field_errors);
            assert_eq!(
                config.allowed_origin.as_deref(),
                Some("https://exchange.example.edu")
            );
            assert_eq!(config.log_format, LogFormat::Json);
        });
    }

    #[test]
    fn test_unparseable_port_is_config_error() {
        let mut vars = cleared();
        vars.push(("SURVEY_PORT", Some("eighty")));

        temp_env::with_vars(vars, || {
            let err = Config::from_env().unwrap_err();
            assert!(matches!(err, AppError::Config(msg) if msg.contains("SURVEY_PORT")));
        });
    }

    #[test]
    fn test_zero_connections_fails_validation() {
        let mut vars = cleared();
        vars.push(("SURVEY_DB_MAX_CONNECTIONS", Some("0")));

        temp_env::with_vars(vars, || {
            assert!(matches!(Config::from_env(), Err(AppError::Validation(_))));
        });
    }

    #[test]
    fn test_logging_is_installed_before_settings_are_read() {
        let mut vars = cleared();
        vars.extend([
            ("SURVEY_PORT", Some("eighty")),
            ("SURVEY_LOG_FORMAT", Some("bunyan")),
        ]);

        temp_env::with_vars(vars, || {
            let mut installed = None;
            let result = Config::bootstrap(|format| {
                installed = Some(format);
                Ok(())
            });

            assert_eq!(installed, Some(LogFormat::Json));
            assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("SURVEY_PORT")));
        });
    }

    #[test]
    fn test_bad_log_format_stops_before_logging() {
        let mut vars = cleared();
        vars.push(("SURVEY_LOG_FORMAT", Some("xml")));

        temp_env::with_vars(vars, || {
            let mut called = false;
            let result = Config::bootstrap(|_| {
                called = true;
                Ok(())
            });

            assert!(!called);
            assert!(matches!(
                result,
                Err(AppError::Config(msg)) if msg.contains("SURVEY_LOG_FORMAT")
            ));
        });
    }

    #[test]
    fn test_bootstrap_loads_full_config() {
        let mut vars = cleared();
        vars.push(("SURVEY_PORT", Some("8081")));

        temp_env::with_vars(vars, || {
            let config = Config::bootstrap(|format| {
                assert_eq!(format, LogFormat::Pretty);
                Ok(())
            })
            .unwrap();

            assert_eq!(config.port, 8081);
            assert_eq!(config.log_format, LogFormat::Pretty);
        });
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("PRETTY".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert_eq!("bunyan".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
