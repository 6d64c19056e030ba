//! Simulation history.
//!
//! Calculated vacations are kept newest first, capped at
//! [`MAX_SIMULATIONS`] entries and pruned by age. The history persists as a
//! versioned JSON document; a store written by an older version, or one that
//! cannot be read, is discarded and replaced by an empty history.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{VacationRequest, VacationResult};

/// Maximum number of simulations kept.
pub const MAX_SIMULATIONS: usize = 20;

/// Current store format version.
pub const HISTORY_VERSION: u32 = 2;

/// Default age after which simulations are dropped.
pub const DEFAULT_MAX_AGE_DAYS: i64 = 365;

/// A recorded vacation simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRecord {
    /// Unique identifier.
    pub id: Uuid,
    /// When the simulation was recorded.
    pub created_at: DateTime<Utc>,
    /// The request that was simulated.
    pub request: VacationRequest,
    /// The calculated result.
    pub result: VacationResult,
}

/// The simulation history, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationHistory {
    version: u32,
    simulations: Vec<SimulationRecord>,
}

impl Default for SimulationHistory {
    fn default() -> Self {
        Self {
            version: HISTORY_VERSION,
            simulations: Vec::new(),
        }
    }
}

/// Only the version is read first, so that older layouts are recognized
/// even when the rest of the document no longer parses.
#[derive(Deserialize)]
struct VersionProbe {
    #[serde(default)]
    version: u32,
}

impl SimulationHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a simulation as the newest entry and returns it.
    ///
    /// Entries older than [`DEFAULT_MAX_AGE_DAYS`] relative to `now`, and the
    /// oldest entries beyond [`MAX_SIMULATIONS`], are dropped.
    pub fn record(
        &mut self,
        request: VacationRequest,
        result: VacationResult,
        now: DateTime<Utc>,
    ) -> &SimulationRecord {
        self.simulations.insert(
            0,
            SimulationRecord {
                id: Uuid::new_v4(),
                created_at: now,
                request,
                result,
            },
        );
        self.simulations.truncate(MAX_SIMULATIONS);
        self.prune_older_than(now - Duration::days(DEFAULT_MAX_AGE_DAYS));
        &self.simulations[0]
    }

    /// The simulations, newest first.
    pub fn simulations(&self) -> &[SimulationRecord] {
        &self.simulations
    }

    /// Finds a simulation by id.
    pub fn get(&self, id: Uuid) -> Option<&SimulationRecord> {
        self.simulations.iter().find(|s| s.id == id)
    }

    /// Number of simulations kept.
    pub fn len(&self) -> usize {
        self.simulations.len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.simulations.is_empty()
    }

    /// Removes every simulation.
    pub fn clear(&mut self) {
        self.simulations.clear();
    }

    /// Drops simulations recorded before `cutoff`. Returns how many were dropped.
    pub fn prune_older_than(&mut self, cutoff: DateTime<Utc>) -> usize {
        let before = self.simulations.len();
        self.simulations.retain(|s| s.created_at >= cutoff);
        before - self.simulations.len()
    }

    /// Loads the history stored at `path`.
    ///
    /// A missing file gives an empty history. Unreadable or outdated stores
    /// are discarded with a log entry. Simulations older than
    /// [`DEFAULT_MAX_AGE_DAYS`] are pruned.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::HistoryStorage`] only when the file exists but
    /// cannot be read from disk.
    pub fn load<P: AsRef<Path>>(path: P, now: DateTime<Utc>) -> EngineResult<Self> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::new()),
            Err(err) => return Err(storage_error(path, err)),
        };

        let mut history = match Self::parse(&content) {
            Ok(Some(history)) => history,
            Ok(None) => {
                info!(path = %path.display(), "Discarding simulation history from an older version");
                return Ok(Self::new());
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Discarding unreadable simulation history");
                return Ok(Self::new());
            }
        };

        let pruned = history.prune_older_than(now - Duration::days(DEFAULT_MAX_AGE_DAYS));
        if pruned > 0 {
            info!(path = %path.display(), pruned, "Pruned expired simulations");
        }
        Ok(history)
    }

    /// Parses a stored document; `None` when it was written by another version.
    fn parse(content: &str) -> Result<Option<Self>, serde_json::Error> {
        let probe: VersionProbe = serde_json::from_str(content)?;
        if probe.version != HISTORY_VERSION {
            return Ok(None);
        }
        serde_json::from_str(content).map(Some)
    }

    /// Writes the history to `path` as JSON.
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> EngineResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|e| storage_error(path, e))?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| storage_error(path, e))
    }
}

fn storage_error(path: &Path, err: impl std::fmt::Display) -> EngineError {
    EngineError::HistoryStorage {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}
