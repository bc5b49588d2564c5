//! Shared application state

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::error::Result;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Everything the app loop and spawned tasks share
pub struct AppState {
    pub config: AppConfig,
    pub api: Arc<ApiClient>,
    pub store: Arc<dyn KeyValueStore>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = if config.ephemeral {
            info!("Running ephemeral, nothing will be persisted");
            Arc::new(MemoryStore::new())
        } else {
            fs::create_dir_all(&config.data_dir)?;
            info!("Data directory: {}", config.data_dir.display());
            Arc::new(FileStore::new(config.data_dir.clone()))
        };

        let api = Arc::new(ApiClient::new(&config));

        Ok(Self { config, api, store })
    }

    /// Where fetched chart images are saved
    pub fn charts_dir(&self) -> PathBuf {
        self.config.data_dir.join("charts")
    }

    /// Where downloaded registry files are saved
    pub fn downloads_dir(&self) -> PathBuf {
        self.config.data_dir.join("downloads")
    }
}
