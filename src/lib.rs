pub mod config;
pub mod error;
pub mod explorer;
pub mod telemetry;

use std::sync::Arc;

use config::ExplorerConfig;
use explorer::scenarios::{ConfiguredStore, ScenarioStore};
use explorer::{Catalog, ExplorerSession};

pub use error::ExplorerError;

/// Open a session over `catalog` with the backend and keys named in `config`.
pub fn open_session(
    catalog: Catalog,
    config: &ExplorerConfig,
) -> Result<ExplorerSession<ConfiguredStore>, ExplorerError> {
    let backend = Arc::new(ConfiguredStore::from_config(&config.storage)?);
    let store = ScenarioStore::with_keys(
        backend,
        config.storage.state_key.clone(),
        config.storage.legacy_key.clone(),
    );
    Ok(ExplorerSession::open(catalog, store, &config.scoring)?)
}
