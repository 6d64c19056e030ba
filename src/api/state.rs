//! Application state for the vacation pay API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::config::ConfigLoader;
use crate::error::EngineResult;
use crate::history::SimulationHistory;

/// Shared application state.
///
/// Holds the loaded tax tables and the simulation history. When a history
/// file is configured, every change to the history is written back to it.
#[derive(Clone)]
pub struct AppState {
    /// The loaded tax table configuration.
    config: Arc<ConfigLoader>,
    /// Recorded simulations.
    history: Arc<RwLock<SimulationHistory>>,
    /// Where the history is persisted, if anywhere.
    history_path: Option<Arc<PathBuf>>,
}

impl AppState {
    /// Creates a state with an in-memory history.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
            history: Arc::new(RwLock::new(SimulationHistory::new())),
            history_path: None,
        }
    }

    /// Creates a state whose history is loaded from and saved to `path`.
    pub fn with_history_file(config: ConfigLoader, path: impl Into<PathBuf>) -> EngineResult<Self> {
        let path = path.into();
        let history = SimulationHistory::load(&path, Utc::now())?;

        Ok(Self {
            config: Arc::new(config),
            history: Arc::new(RwLock::new(history)),
            history_path: Some(Arc::new(path)),
        })
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the shared simulation history.
    pub fn history(&self) -> &RwLock<SimulationHistory> {
        &self.history
    }

    /// Writes the history to its file, if one is configured.
    pub async fn persist(&self, history: &SimulationHistory) -> EngineResult<()> {
        match &self.history_path {
            Some(path) => history.save(path.as_path()).await,
            None => Ok(()),
        }
    }
}
