//! Matricula Core Library
//!
//! This crate provides the core functionality for Matricula, including:
//! - Enrollment domain (entities, repositories, service)
//! - CEP lookup client (ViaCEP-compatible)
//! - Storage (SQLite pools and migrations)
//! - Configuration management

pub mod cep;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod storage;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::cep::{CepAddress, CepClient};
    pub use crate::config::Config;
    pub use crate::domain::enrollment::{EnrollmentInfo, EnrollmentInput, EnrollmentService};
    pub use crate::error::{Error, Result};
}
