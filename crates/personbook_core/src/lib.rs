//! Record access for person documents stored in SQLite.
//! This crate owns the document shape and every storage invariant.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, StoreConfig, StoreLocation};
pub use logging::{
    default_log_level, flush_logging, init_from_config, init_logging, logging_status,
};
pub use model::person::{
    DeleteSummary, NewPerson, Person, PersonId, PersonSummary, PersonValidationError,
};
pub use repo::person_repo::{
    PersonQuery, PersonRepository, RepoError, RepoResult, SortField, SortOrder,
    SqlitePersonRepository,
};
pub use service::person_service::PersonService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
