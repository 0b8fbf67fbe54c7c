//! SQLite repository implementations for enrollments and addresses
//!
//! Upserts are single `INSERT .. ON CONFLICT` statements keyed on the
//! owning id (`user_id` for enrollments, `enrollment_id` for addresses),
//! followed by a re-select so callers always observe the persisted row,
//! including identifiers and timestamps preserved from a prior insert.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::domain::enrollment::{
    Address, AddressParams, AddressRepository, Enrollment, EnrollmentParams, EnrollmentRepository,
    EnrollmentWithAddresses,
};
use crate::error::{Error, Result};

/// SQLite implementation of the enrollment repository
#[derive(Debug, Clone)]
pub struct SqliteEnrollmentRepository {
    pool: SqlitePool,
}

impl SqliteEnrollmentRepository {
    /// Create a new repository with the given pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EnrollmentRepository for SqliteEnrollmentRepository {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Enrollment>> {
        let row: Option<EnrollmentRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, name, document, birth_date, phone, created_at, updated_at
            FROM enrollments
            WHERE user_id = ?
            "#,
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.map(|r| r.into_enrollment()).transpose()
    }

    async fn find_with_addresses_by_user_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<EnrollmentWithAddresses>> {
        let Some(enrollment) = self.find_by_user_id(user_id).await? else {
            return Ok(None);
        };

        let rows: Vec<AddressRow> = sqlx::query_as(
            r#"
            SELECT id, enrollment_id, cep, street, number, neighborhood, city, state,
                   complement, created_at, updated_at
            FROM addresses
            WHERE enrollment_id = ?
            ORDER BY created_at ASC
            "#,
        )
        .bind(enrollment.id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let addresses = rows
            .into_iter()
            .map(|r| r.into_address())
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(EnrollmentWithAddresses {
            enrollment,
            addresses,
        }))
    }

    async fn upsert(&self, user_id: Uuid, params: &EnrollmentParams) -> Result<Enrollment> {
        let fresh = Enrollment::new(user_id, params);

        sqlx::query(
            r#"
            INSERT INTO enrollments (id, user_id, name, document, birth_date, phone, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                name = excluded.name,
                document = excluded.document,
                birth_date = excluded.birth_date,
                phone = excluded.phone,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(fresh.id.to_string())
        .bind(fresh.user_id.to_string())
        .bind(&fresh.name)
        .bind(&fresh.document)
        .bind(fresh.birth_date)
        .bind(&fresh.phone)
        .bind(fresh.created_at)
        .bind(fresh.updated_at)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        let stored = self
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| Error::Other("enrollment row missing after upsert".to_string()))?;

        debug!(user_id = %user_id, enrollment_id = %stored.id, "Enrollment upserted");
        Ok(stored)
    }
}

/// SQLite implementation of the address repository
#[derive(Debug, Clone)]
pub struct SqliteAddressRepository {
    pool: SqlitePool,
}

impl SqliteAddressRepository {
    /// Create a new repository with the given pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AddressRepository for SqliteAddressRepository {
    async fn find_by_enrollment_id(&self, enrollment_id: Uuid) -> Result<Option<Address>> {
        let row: Option<AddressRow> = sqlx::query_as(
            r#"
            SELECT id, enrollment_id, cep, street, number, neighborhood, city, state,
                   complement, created_at, updated_at
            FROM addresses
            WHERE enrollment_id = ?
            "#,
        )
        .bind(enrollment_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.map(|r| r.into_address()).transpose()
    }

    async fn upsert(&self, enrollment_id: Uuid, params: &AddressParams) -> Result<Address> {
        let fresh = Address::new(enrollment_id, params);

        sqlx::query(
            r#"
            INSERT INTO addresses (id, enrollment_id, cep, street, number, neighborhood,
                                   city, state, complement, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(enrollment_id) DO UPDATE SET
                cep = excluded.cep,
                street = excluded.street,
                number = excluded.number,
                neighborhood = excluded.neighborhood,
                city = excluded.city,
                state = excluded.state,
                complement = excluded.complement,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(fresh.id.to_string())
        .bind(fresh.enrollment_id.to_string())
        .bind(&fresh.cep)
        .bind(&fresh.street)
        .bind(&fresh.number)
        .bind(&fresh.neighborhood)
        .bind(&fresh.city)
        .bind(&fresh.state)
        .bind(&fresh.complement)
        .bind(fresh.created_at)
        .bind(fresh.updated_at)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        let stored = self
            .find_by_enrollment_id(enrollment_id)
            .await?
            .ok_or_else(|| Error::Other("address row missing after upsert".to_string()))?;

        debug!(enrollment_id = %enrollment_id, address_id = %stored.id, "Address upserted");
        Ok(stored)
    }
}

#[derive(sqlx::FromRow)]
struct EnrollmentRow {
    id: String,
    user_id: String,
    name: String,
    document: String,
    birth_date: NaiveDate,
    phone: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EnrollmentRow {
    fn into_enrollment(self) -> Result<Enrollment> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| Error::Parse(format!("Invalid enrollment ID: {}", e)))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| Error::Parse(format!("Invalid user ID: {}", e)))?;

        Ok(Enrollment {
            id,
            user_id,
            name: self.name,
            document: self.document,
            birth_date: self.birth_date,
            phone: self.phone,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AddressRow {
    id: String,
    enrollment_id: String,
    cep: String,
    street: String,
    number: String,
    neighborhood: String,
    city: String,
    state: String,
    complement: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AddressRow {
    fn into_address(self) -> Result<Address> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| Error::Parse(format!("Invalid address ID: {}", e)))?;
        let enrollment_id = Uuid::parse_str(&self.enrollment_id)
            .map_err(|e| Error::Parse(format!("Invalid enrollment ID: {}", e)))?;

        Ok(Address {
            id,
            enrollment_id,
            cep: self.cep,
            street: self.street,
            number: self.number,
            neighborhood: self.neighborhood,
            city: self.city,
            state: self.state,
            complement: self.complement,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
