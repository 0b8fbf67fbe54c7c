//! Enrollment and address entities
//!
//! `Enrollment` and `Address` are the persisted records. `EnrollmentParams`
//! and `AddressParams` carry the writable fields, keeping the upsert keys
//! (`user_id`, `enrollment_id`) out of the payload so they can never be
//! rewritten. `EnrollmentInfo` and `AddressInfo` are the outward
//! projections with internal identifiers and audit timestamps removed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cep::normalize_cep;

/// A person's enrollment record
///
/// Each user owns at most one enrollment; `user_id` is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user (opaque to this crate, no users table exists here)
    pub user_id: Uuid,
    /// Full name
    pub name: String,
    /// National document number
    pub document: String,
    /// Date of birth
    pub birth_date: NaiveDate,
    /// Contact phone
    pub phone: String,
    /// When the enrollment was created
    pub created_at: DateTime<Utc>,
    /// When the enrollment was last updated
    pub updated_at: DateTime<Utc>,
}

impl Enrollment {
    /// Create a new enrollment for a user
    pub fn new(user_id: Uuid, params: &EnrollmentParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: params.name.clone(),
            document: params.document.clone(),
            birth_date: params.birth_date,
            phone: params.phone.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A postal address attached to an enrollment
///
/// Each enrollment owns at most one address; `enrollment_id` is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    /// Unique identifier
    pub id: Uuid,
    /// Owning enrollment
    pub enrollment_id: Uuid,
    /// Postal code, stored without the hyphen
    pub cep: String,
    /// Street name
    pub street: String,
    /// Street number
    pub number: String,
    /// Neighborhood
    pub neighborhood: String,
    /// City
    pub city: String,
    /// State
    pub state: String,
    /// Free-form detail; `None` when the caller omitted it
    pub complement: Option<String>,
    /// When the address was created
    pub created_at: DateTime<Utc>,
    /// When the address was last updated
    pub updated_at: DateTime<Utc>,
}

impl Address {
    /// Create a new address for an enrollment
    pub fn new(enrollment_id: Uuid, params: &AddressParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            enrollment_id,
            cep: params.cep.clone(),
            street: params.street.clone(),
            number: params.number.clone(),
            neighborhood: params.neighborhood.clone(),
            city: params.city.clone(),
            state: params.state.clone(),
            complement: params.complement.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Writable enrollment fields
///
/// The owning user id is passed separately on writes, never inside the
/// payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentParams {
    pub name: String,
    pub document: String,
    pub birth_date: NaiveDate,
    pub phone: String,
}

/// Writable address fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressParams {
    pub cep: String,
    pub street: String,
    pub number: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    /// Distinguishes omitted (`None`) from provided-but-empty (`Some("")`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
}

impl AddressParams {
    /// Copy of the params with the CEP normalized
    pub fn normalized(&self) -> Self {
        Self {
            cep: normalize_cep(&self.cep),
            ..self.clone()
        }
    }
}

/// Complete write payload: the owning user, the enrollment fields, and
/// the address as its own nested object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentInput {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub enrollment: EnrollmentParams,
    pub address: AddressParams,
}

/// An enrollment paired with every address row it owns
#[derive(Debug, Clone)]
pub struct EnrollmentWithAddresses {
    pub enrollment: Enrollment,
    pub addresses: Vec<Address>,
}

/// Outward projection of an enrollment
///
/// Carries no owning user id and no audit timestamps. When the
/// enrollment has no address the `address` field is omitted from
/// serialized output entirely rather than emitted as null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentInfo {
    pub id: Uuid,
    pub name: String,
    pub document: String,
    pub birth_date: NaiveDate,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressInfo>,
}

impl EnrollmentInfo {
    /// Build the projection from an enrollment and its first address, if any
    pub fn from_parts(enrollment: &Enrollment, address: Option<&Address>) -> Self {
        Self {
            id: enrollment.id,
            name: enrollment.name.clone(),
            document: enrollment.document.clone(),
            birth_date: enrollment.birth_date,
            phone: enrollment.phone.clone(),
            address: address.map(AddressInfo::from),
        }
    }
}

/// Outward projection of an address
///
/// Carries no owning enrollment id and no audit timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressInfo {
    pub id: Uuid,
    pub cep: String,
    pub street: String,
    pub number: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub complement: Option<String>,
}

impl From<&Address> for AddressInfo {
    fn from(address: &Address) -> Self {
        Self {
            id: address.id,
            cep: address.cep.clone(),
            street: address.street.clone(),
            number: address.number.clone(),
            neighborhood: address.neighborhood.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            complement: address.complement.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_enrollment_params() -> EnrollmentParams {
        EnrollmentParams {
            name: "Ana Souza".to_string(),
            document: "12345678900".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 4, 21).expect("valid date"),
            phone: "11999998888".to_string(),
        }
    }

    fn sample_address_params() -> AddressParams {
        AddressParams {
            cep: "01001-000".to_string(),
            street: "Praca da Se".to_string(),
            number: "100".to_string(),
            neighborhood: "Se".to_string(),
            city: "Sao Paulo".to_string(),
            state: "SP".to_string(),
            complement: Some("apto 42".to_string()),
        }
    }

    #[test]
    fn test_new_enrollment_copies_params() {
        let user_id = Uuid::new_v4();
        let enrollment = Enrollment::new(user_id, &sample_enrollment_params());

        assert_eq!(enrollment.user_id, user_id);
        assert_eq!(enrollment.name, "Ana Souza");
        assert_eq!(enrollment.document, "12345678900");
        assert_eq!(enrollment.created_at, enrollment.updated_at);
    }

    #[test]
    fn test_new_address_copies_params() {
        let enrollment_id = Uuid::new_v4();
        let address = Address::new(enrollment_id, &sample_address_params());

        assert_eq!(address.enrollment_id, enrollment_id);
        assert_eq!(address.cep, "01001-000");
        assert_eq!(address.complement, Some("apto 42".to_string()));
    }

    #[test]
    fn test_normalized_params_strip_hyphen_only() {
        let params = sample_address_params().normalized();

        assert_eq!(params.cep, "01001000");
        assert_eq!(params.street, "Praca da Se");
        assert_eq!(params.complement, Some("apto 42".to_string()));
    }

    #[test]
    fn test_info_without_address_omits_field() {
        let enrollment = Enrollment::new(Uuid::new_v4(), &sample_enrollment_params());
        let info = EnrollmentInfo::from_parts(&enrollment, None);

        let value = serde_json::to_value(&info).expect("serialize");
        let object = value.as_object().expect("object");

        assert!(!object.contains_key("address"));
        assert!(!object.contains_key("user_id"));
        assert!(!object.contains_key("created_at"));
        assert!(!object.contains_key("updated_at"));
    }

    #[test]
    fn test_info_with_address_strips_internal_fields() {
        let enrollment = Enrollment::new(Uuid::new_v4(), &sample_enrollment_params());
        let address = Address::new(enrollment.id, &sample_address_params());
        let info = EnrollmentInfo::from_parts(&enrollment, Some(&address));

        let value = serde_json::to_value(&info).expect("serialize");
        let address_value = value.get("address").expect("address present");
        let address_object = address_value.as_object().expect("object");

        assert_eq!(
            address_object.get("street").and_then(|v| v.as_str()),
            Some("Praca da Se")
        );
        assert!(!address_object.contains_key("enrollment_id"));
        assert!(!address_object.contains_key("created_at"));
        assert!(!address_object.contains_key("updated_at"));
    }

    #[test]
    fn test_input_deserializes_flattened_payload() {
        let json = r#"{
            "user_id": "7f2c1a90-9d13-4b7e-8a6c-64f2f4f7a3a1",
            "name": "Ana Souza",
            "document": "12345678900",
            "birth_date": "1990-04-21",
            "phone": "11999998888",
            "address": {
                "cep": "01001-000",
                "street": "Praca da Se",
                "number": "100",
                "neighborhood": "Se",
                "city": "Sao Paulo",
                "state": "SP"
            }
        }"#;

        let input: EnrollmentInput = serde_json::from_str(json).expect("parse");

        assert_eq!(input.enrollment.name, "Ana Souza");
        assert_eq!(input.address.cep, "01001-000");
        assert_eq!(input.address.complement, None);
    }

    #[test]
    fn test_input_keeps_empty_complement_distinct_from_omitted() {
        let json = r#"{
            "user_id": "7f2c1a90-9d13-4b7e-8a6c-64f2f4f7a3a1",
            "name": "Ana Souza",
            "document": "12345678900",
            "birth_date": "1990-04-21",
            "phone": "11999998888",
            "address": {
                "cep": "01001000",
                "street": "Praca da Se",
                "number": "100",
                "neighborhood": "Se",
                "city": "Sao Paulo",
                "state": "SP",
                "complement": ""
            }
        }"#;

        let input: EnrollmentInput = serde_json::from_str(json).expect("parse");
        assert_eq!(input.address.complement, Some(String::new()));
    }
}
