//! Configuration loading and management for the vacation pay engine.
//!
//! This module loads the effective-dated INSS and IRRF tables from YAML
//! files and selects the table set in force for a given vacation.
//!
//! # Example
//!
//! ```no_run
//! use ferias_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/clt").unwrap();
//! println!("Loaded rule set: {}", config.jurisdiction().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    BracketMethod, BracketTable, EngineConfig, JurisdictionMetadata, TaxBracket, TaxTables,
};
