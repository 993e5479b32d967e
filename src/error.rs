use crate::config::ConfigError;
use crate::explorer::catalog::CatalogError;
use crate::explorer::scenarios::{ScenarioStoreError, StorageError};
use crate::explorer::session::SessionError;
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum ExplorerError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Catalog(CatalogError),
    Storage(StorageError),
    Scenario(ScenarioStoreError),
    Session(SessionError),
}

impl fmt::Display for ExplorerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExplorerError::Config(err) => write!(f, "configuration error: {}", err),
            ExplorerError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            ExplorerError::Catalog(err) => write!(f, "catalog error: {}", err),
            ExplorerError::Storage(err) => write!(f, "storage error: {}", err),
            ExplorerError::Scenario(err) => write!(f, "scenario error: {}", err),
            ExplorerError::Session(err) => write!(f, "session error: {}", err),
        }
    }
}

impl std::error::Error for ExplorerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExplorerError::Config(err) => Some(err),
            ExplorerError::Telemetry(err) => Some(err),
            ExplorerError::Catalog(err) => Some(err),
            ExplorerError::Storage(err) => Some(err),
            ExplorerError::Scenario(err) => Some(err),
            ExplorerError::Session(err) => Some(err),
        }
    }
}

impl From<ConfigError> for ExplorerError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for ExplorerError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<CatalogError> for ExplorerError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

impl From<StorageError> for ExplorerError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<ScenarioStoreError> for ExplorerError {
    fn from(value: ScenarioStoreError) -> Self {
        Self::Scenario(value)
    }
}

impl From<SessionError> for ExplorerError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}
