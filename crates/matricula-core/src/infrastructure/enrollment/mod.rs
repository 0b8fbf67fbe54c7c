//! Enrollment infrastructure implementations
//!
//! This module contains concrete implementations of the enrollment
//! repository traits using SQLite.

mod repository;

pub use repository::{SqliteAddressRepository, SqliteEnrollmentRepository};
