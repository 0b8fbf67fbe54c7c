//! Repository traits for enrollment persistence
//!
//! These traits abstract over the storage backend so the service layer
//! can be exercised against fakes in tests.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;

use super::enrollment::{Address, AddressParams, Enrollment, EnrollmentParams, EnrollmentWithAddresses};

/// Repository trait for enrollment persistence
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Get the enrollment owned by a user
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Enrollment>>;

    /// Get the enrollment owned by a user together with all its address rows
    async fn find_with_addresses_by_user_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<EnrollmentWithAddresses>>;

    /// Insert an enrollment for a user, or update every non-key field of
    /// the existing one
    async fn upsert(&self, user_id: Uuid, params: &EnrollmentParams) -> Result<Enrollment>;
}

/// Repository trait for address persistence
#[async_trait]
pub trait AddressRepository: Send + Sync {
    /// Get the address owned by an enrollment
    async fn find_by_enrollment_id(&self, enrollment_id: Uuid) -> Result<Option<Address>>;

    /// Insert an address for an enrollment, or update every non-key field
    /// of the existing one
    async fn upsert(&self, enrollment_id: Uuid, params: &AddressParams) -> Result<Address>;
}
