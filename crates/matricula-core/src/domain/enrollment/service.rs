//! Enrollment service
//!
//! Composes the enrollment repositories with the CEP lookup client.
//! Each operation is a single linear pass; concurrent writes for the
//! same user are resolved by the upsert keys, so the last write wins.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cep::{CepAddress, CepClient};
use crate::error::{Error, Result};

use super::enrollment::{EnrollmentInfo, EnrollmentInput};
use super::repository::{AddressRepository, EnrollmentRepository};

/// Service for reading and writing enrollments
pub struct EnrollmentService<E: EnrollmentRepository, A: AddressRepository> {
    enrollments: Arc<E>,
    addresses: Arc<A>,
    cep_client: CepClient,
}

impl<E: EnrollmentRepository, A: AddressRepository> EnrollmentService<E, A> {
    /// Create a new service over the given repositories and lookup client
    pub fn new(enrollments: Arc<E>, addresses: Arc<A>, cep_client: CepClient) -> Self {
        Self {
            enrollments,
            addresses,
            cep_client,
        }
    }

    /// Resolve a postal code to an address fragment
    ///
    /// The CEP is forwarded to the lookup service as given.
    pub async fn lookup_address(&self, cep: &str) -> Result<CepAddress> {
        self.cep_client.lookup(cep).await
    }

    /// Get the enrollment owned by a user, shaped for external callers
    ///
    /// When several address rows exist only the first is embedded. The
    /// projection never exposes the owning user id or audit timestamps.
    pub async fn enrollment_by_user(&self, user_id: Uuid) -> Result<EnrollmentInfo> {
        let found = self
            .enrollments
            .find_with_addresses_by_user_id(user_id)
            .await?
            .ok_or(Error::NotFound)?;

        if found.addresses.len() > 1 {
            warn!(
                user_id = %user_id,
                count = found.addresses.len(),
                "Multiple address rows found; embedding only the first"
            );
        }

        let first_address = found.addresses.first();
        debug!(
            user_id = %user_id,
            has_address = first_address.is_some(),
            "Enrollment loaded"
        );

        Ok(EnrollmentInfo::from_parts(&found.enrollment, first_address))
    }

    /// Create or update the enrollment and address for a user
    ///
    /// The CEP is normalized and then validated through the lookup
    /// service before anything is persisted; every lookup failure is
    /// reported as invalid data, whatever its cause. The enrollment and
    /// address upserts are two separate statements, so a failure of the
    /// second leaves the first in place.
    pub async fn upsert_enrollment(&self, input: EnrollmentInput) -> Result<()> {
        let address = input.address.normalized();

        if let Err(error) = self.cep_client.lookup(&address.cep).await {
            debug!(cep = %address.cep, error = %error, "CEP validation failed");
            return Err(Error::InvalidData(vec!["invalid CEP".to_string()]));
        }

        let enrollment = self
            .enrollments
            .upsert(input.user_id, &input.enrollment)
            .await?;

        self.addresses.upsert(enrollment.id, &address).await?;

        info!(
            user_id = %input.user_id,
            enrollment_id = %enrollment.id,
            "Enrollment saved"
        );
        Ok(())
    }
}
