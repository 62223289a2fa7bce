use rocket::figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use crate::storage::{FileBackend, MemoryBackend, SharedBackend};

/// Tracker settings, read from the same `Rocket.toml` / `ROCKET_*` sources as
/// the server itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub storage_path: PathBuf,
    /// Keep everything in memory and ignore `storage_path`.
    pub in_memory: bool,
    /// Origin prefixes allowed to call the API.
    pub allowed_origins: Vec<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("stance-store.json"),
            in_memory: false,
            allowed_origins: vec![
                "chrome-extension://".into(),
                "moz-extension://".into(),
                "http://localhost".into(),
                "http://127.0.0.1".into(),
            ],
        }
    }
}

impl TrackerConfig {
    pub fn from_figment(figment: &Figment) -> Self {
        figment.extract().unwrap_or_else(|e| {
            warn!("Invalid tracker configuration, using defaults: {}", e);
            Self::default()
        })
    }

    pub fn backend(&self) -> SharedBackend {
        if self.in_memory {
            info!("💾 Using in-memory stance storage");
            Arc::new(MemoryBackend::new())
        } else {
            info!("💾 Using stance storage at {}", self.storage_path.display());
            Arc::new(FileBackend::new(self.storage_path.clone()))
        }
    }
}
