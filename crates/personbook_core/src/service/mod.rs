//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the fixed person use-cases.
//! - Keep callers decoupled from storage details.

pub mod person_service;
