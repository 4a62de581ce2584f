//! Surface-level use-case services.
//!
//! # Responsibility
//! - Compose engine functions into the calls UI surfaces make.
//! - Keep surfaces decoupled from discovery persistence details.

pub mod resonance_service;
