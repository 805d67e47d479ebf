//! Customer DTOs
//!
//! Request and response types for customer management endpoints.

use chrono::{DateTime, Utc};
use gestao_core::models::{Customer, CustomerChanges};
use gestao_core::traits::CustomerFilter;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Customer creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CustomerCreateRequest {
    /// Customer name
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    /// Brazilian taxpayer id, 11 digits
    #[validate(length(equal = 11, message = "Cpf must have 11 digits"))]
    pub cpf: String,

    /// Email address (optional)
    pub email: Option<String>,

    /// Phone number, 11 digits (optional)
    pub phone: Option<String>,
}

impl CustomerCreateRequest {
    /// Convert to Customer entity
    ///
    /// The service stamps `enabled` and the timestamps; this only carries
    /// the caller-supplied fields.
    pub fn to_customer(&self) -> Customer {
        Customer {
            id: 0,
            name: self.name.clone(),
            cpf: self.cpf.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            ..Default::default()
        }
    }
}

/// Customer partial update request
///
/// Absent fields are left untouched on the stored record.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CustomerUpdateRequest {
    /// New name
    pub name: Option<String>,

    /// New cpf
    pub cpf: Option<String>,

    /// New email
    pub email: Option<String>,

    /// New phone
    pub phone: Option<String>,
}

impl CustomerUpdateRequest {
    /// Convert to the service-layer changeset
    pub fn to_changes(&self) -> CustomerChanges {
        CustomerChanges {
            name: self.name.clone(),
            cpf: self.cpf.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// Customer response
#[derive(Debug, Clone, Serialize)]
pub struct CustomerResponse {
    /// Customer ID
    pub id: i64,

    /// Customer name
    pub name: String,

    /// Taxpayer id
    pub cpf: String,

    /// Email address
    pub email: Option<String>,

    /// Phone number
    pub phone: Option<String>,

    /// Soft-delete flag
    pub enabled: bool,

    /// Created timestamp
    pub created_at: DateTime<Utc>,

    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
            cpf: customer.cpf,
            email: customer.email,
            phone: customer.phone,
            enabled: customer.enabled,
            created_at: customer.created_at,
            updated_at: customer.updated_at,
        }
    }
}

/// Customer search filter parameters
///
/// Every field is an optional equality filter; absent fields are not applied.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CustomerFilterParams {
    /// Filter by email
    pub email: Option<String>,

    /// Filter by cpf
    pub cpf: Option<String>,

    /// Filter by phone
    pub phone: Option<String>,

    /// Filter by enabled flag
    pub enabled: Option<bool>,
}

impl CustomerFilterParams {
    /// Convert to the repository filter
    pub fn to_filter(&self) -> CustomerFilter {
        CustomerFilter {
            email: self.email.clone(),
            cpf: self.cpf.clone(),
            phone: self.phone.clone(),
            enabled: self.enabled,
        }
    }
}
