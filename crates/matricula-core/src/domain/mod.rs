//! Domain layer
//!
//! Contains the core business logic and domain models for matricula.

pub mod enrollment;
