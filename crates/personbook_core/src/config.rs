//! Process configuration for the person store.
//!
//! # Responsibility
//! - Resolve the store location and logging options from the environment.
//! - Open the configured store.
//!
//! # Invariants
//! - `PERSONBOOK_DB_URI` is required; there is no implicit default store.
//! - `.env` values never override variables already set in the process.

use crate::db::{open_db, open_db_in_memory, DbResult};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_URI_VAR: &str = "PERSONBOOK_DB_URI";
pub const LOG_LEVEL_VAR: &str = "PERSONBOOK_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "PERSONBOOK_LOG_DIR";
/// `PERSONBOOK_DB_URI` value selecting a transient in-memory store.
pub const IN_MEMORY_URI: &str = ":memory:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingVar(&'static str),
    InvalidValue { var: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingVar(var) => write!(f, "environment variable `{var}` is not set"),
            Self::InvalidValue { var, message } => {
                write!(f, "invalid value for `{var}`: {message}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Where the store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    InMemory,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub location: StoreLocation,
    pub log_level: Option<String>,
    pub log_dir: Option<String>,
}

impl StoreConfig {
    /// Loads `.env` (if present) and reads configuration from the process
    /// environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let uri = lookup(DB_URI_VAR)
            .map(|value| value.trim().to_string())
            .ok_or(ConfigError::MissingVar(DB_URI_VAR))?;
        if uri.is_empty() {
            return Err(ConfigError::InvalidValue {
                var: DB_URI_VAR,
                message: "value is empty".to_string(),
            });
        }

        let location = if uri == IN_MEMORY_URI {
            StoreLocation::InMemory
        } else {
            StoreLocation::File(PathBuf::from(uri))
        };

        Ok(Self {
            location,
            log_level: non_empty(lookup(LOG_LEVEL_VAR)),
            log_dir: non_empty(lookup(LOG_DIR_VAR)),
        })
    }

    /// Opens and migrates the configured store.
    pub fn open(&self) -> DbResult<Connection> {
        match &self.location {
            StoreLocation::InMemory => open_db_in_memory(),
            StoreLocation::File(path) => open_db(path),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|inner| inner.trim().to_string())
        .filter(|inner| !inner.is_empty())
}
