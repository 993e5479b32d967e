use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::explorer::scenarios::{DEFAULT_LEGACY_KEY, DEFAULT_STATE_KEY};
use crate::explorer::scoring::DEFAULT_SCORE_FLOOR;

/// Distinguishes runtime behavior for different stages of the host.
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

/// Top-level configuration for an explorer host.
#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    pub environment: AppEnvironment,
    pub storage: StorageConfig,
    pub scoring: ScoringConfig,
    pub telemetry: TelemetryConfig,
}

impl ExplorerConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("EXPLORER_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let state_key = non_empty_var("EXPLORER_STATE_KEY", DEFAULT_STATE_KEY)?;
        let legacy_key = non_empty_var("EXPLORER_LEGACY_KEY", DEFAULT_LEGACY_KEY)?;
        let state_dir = env::var("EXPLORER_STATE_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let score_floor = match env::var("EXPLORER_SCORE_FLOOR") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|floor| floor.is_finite() && *floor > 0.0 && *floor < 1.0)
                .ok_or(ConfigError::InvalidScoreFloor { value: raw })?,
            Err(_) => DEFAULT_SCORE_FLOOR,
        };

        let log_level = env::var("EXPLORER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            storage: StorageConfig {
                state_key,
                legacy_key,
                state_dir,
            },
            scoring: ScoringConfig { score_floor },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn non_empty_var(name: &'static str, default: &str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => Err(ConfigError::EmptyKey { name }),
        Ok(value) => Ok(value.trim().to_string()),
        Err(_) => Ok(default.to_string()),
    }
}

/// Where scenario state is persisted.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub state_key: String,
    pub legacy_key: String,
    /// Directory for the file-backed store; `None` keeps state in memory.
    pub state_dir: Option<PathBuf>,
}

/// Scoring knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    pub score_floor: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            score_floor: DEFAULT_SCORE_FLOOR,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidScoreFloor { value: String },
    EmptyKey { name: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidScoreFloor { value } => write!(
                f,
                "EXPLORER_SCORE_FLOOR must be a number strictly between 0 and 1, got '{}'",
                value
            ),
            ConfigError::EmptyKey { name } => write!(f, "{} must not be empty", name),
        }
    }
}

impl std::error::Error for ConfigError {}
