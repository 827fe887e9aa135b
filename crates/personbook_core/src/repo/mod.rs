//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract for person documents.
//! - Isolate SQLite query details from the use-case service.
//!
//! # Invariants
//! - Repository writes validate documents before persistence.
//! - Absence on reads is `Ok(None)`; `NotFound` is reserved for writes that
//!   target a missing id.

pub mod person_repo;
