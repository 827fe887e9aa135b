//! Domain model for person documents.
//!
//! # Responsibility
//! - Define the canonical `Person` document and its creation input.
//! - Define read projections returned by narrowed queries.
//!
//! # Invariants
//! - Every persisted person is identified by a storage-assigned `PersonId`.
//! - `name` is required on creation and on every save.

pub mod person;
