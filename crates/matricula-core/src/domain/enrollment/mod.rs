//! Enrollment domain module
//!
//! Implements the enrollment record attached to a user, with an optional
//! postal address validated against the CEP lookup service:
//!
//! - **Entities**: `Enrollment` and `Address`, plus the write params and
//!   the outward `EnrollmentInfo`/`AddressInfo` projections
//! - **Repositories**: traits for the two persistence seams
//! - **Service**: the read/write operations composing repositories with
//!   the lookup client
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use matricula_core::cep::CepClient;
//! use matricula_core::domain::enrollment::EnrollmentService;
//! use matricula_core::infrastructure::enrollment::{
//!     SqliteAddressRepository, SqliteEnrollmentRepository,
//! };
//!
//! let service = EnrollmentService::new(
//!     Arc::new(SqliteEnrollmentRepository::new(db.pool().clone())),
//!     Arc::new(SqliteAddressRepository::new(db.pool().clone())),
//!     CepClient::new()?,
//! );
//!
//! let info = service.enrollment_by_user(user_id).await?;
//! ```

mod enrollment;
mod repository;
mod service;

pub use enrollment::{
    Address, AddressInfo, AddressParams, Enrollment, EnrollmentInfo, EnrollmentInput,
    EnrollmentParams, EnrollmentWithAddresses,
};
pub use repository::{AddressRepository, EnrollmentRepository};
pub use service::EnrollmentService;
