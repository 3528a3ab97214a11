use std::env;
use std::fmt;

pub const DEFAULT_ROSTER_URL: &str = "https://randomuser.me/api/";

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub roster: RosterSourceConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let base_url =
            env::var("ROSTER_API_URL").unwrap_or_else(|_| DEFAULT_ROSTER_URL.to_string());
        let results = env::var("ROSTER_RESULTS")
            .unwrap_or_else(|_| "500".to_string())
            .parse::<usize>()
            .ok()
            .filter(|results| *results > 0)
            .ok_or(ConfigError::InvalidResults)?;
        let nationality = env::var("ROSTER_NATIONALITY").unwrap_or_else(|_| "ca".to_string());
        let seed = env::var("ROSTER_SEED").unwrap_or_else(|_| "vendease".to_string());
        let timeout_secs = env::var("ROSTER_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTimeout)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            roster: RosterSourceConfig {
                base_url,
                results,
                nationality,
                seed,
                timeout_secs,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where and how the roster is fetched from the Random User Generator API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterSourceConfig {
    pub base_url: String,
    pub results: usize,
    pub nationality: String,
    pub seed: String,
    pub timeout_secs: u64,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidResults,
    InvalidTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidResults => write!(f, "ROSTER_RESULTS must be a positive integer"),
            ConfigError::InvalidTimeout => {
                write!(f, "ROSTER_TIMEOUT_SECS must be a whole number of seconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
