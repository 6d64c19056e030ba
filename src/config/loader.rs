//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the
//! effective-dated tax tables from YAML files.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{EngineConfig, JurisdictionMetadata, TaxTables};

/// Loads and provides access to the statutory tax tables.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/clt/
/// ├── jurisdiction.yaml   # Rule set metadata
/// └── tables/
///     ├── 2023-05-01.yaml # INSS + IRRF tables effective from this date
///     └── 2024-01-01.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use ferias_engine::config::ConfigLoader;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/clt").unwrap();
///
/// let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
/// let tables = loader.tables_for(date).unwrap();
/// println!("Tables effective {}", tables.effective_date);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - A table fails validation (unordered ceilings, rates outside `[0, 1]`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let jurisdiction_path = path.join("jurisdiction.yaml");
        let metadata = Self::load_yaml::<JurisdictionMetadata>(&jurisdiction_path)?;

        let tables_dir = path.join("tables");
        let tables = Self::load_tables(&tables_dir)?;

        Ok(Self {
            config: EngineConfig::new(metadata, tables),
        })
    }

    /// Builds a loader from tables already in memory.
    pub fn from_tables(metadata: JurisdictionMetadata, tables: Vec<TaxTables>) -> Self {
        Self {
            config: EngineConfig::new(metadata, tables),
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads and validates all table files from the tables directory.
    fn load_tables(tables_dir: &Path) -> EngineResult<Vec<TaxTables>> {
        let tables_dir_str = tables_dir.display().to_string();

        if !tables_dir.exists() {
            return Err(EngineError::ConfigNotFound {
                path: tables_dir_str,
            });
        }

        let entries = fs::read_dir(tables_dir).map_err(|_| EngineError::ConfigNotFound {
            path: tables_dir_str.clone(),
        })?;

        let mut tables = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: tables_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let table = Self::load_yaml::<TaxTables>(&path)?;
                table
                    .validate()
                    .map_err(|message| EngineError::ConfigParseError {
                        path: path.display().to_string(),
                        message,
                    })?;
                tables.push(table);
            }
        }

        if tables.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no table files found)", tables_dir_str),
            });
        }

        Ok(tables)
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the jurisdiction metadata.
    pub fn jurisdiction(&self) -> &JurisdictionMetadata {
        self.config.jurisdiction()
    }

    /// Gets the tax tables in force on a given date.
    ///
    /// Finds the most recent table set that is effective on or before `date`.
    pub fn tables_for(&self, date: NaiveDate) -> EngineResult<&TaxTables> {
        self.config
            .tables()
            .iter()
            .rfind(|t| t.effective_date <= date)
            .ok_or(EngineError::TablesNotFound { date })
    }

    /// Gets the tax tables in force on `date`, or the earliest set when
    /// `date` precedes every effective date.
    ///
    /// The flag is `true` when the earliest set was substituted.
    pub fn tables_or_earliest(&self, date: NaiveDate) -> EngineResult<(&TaxTables, bool)> {
        if let Ok(tables) = self.tables_for(date) {
            return Ok((tables, false));
        }
        self.config
            .tables()
            .first()
            .map(|tables| (tables, true))
            .ok_or(EngineError::TablesNotFound { date })
    }
}
