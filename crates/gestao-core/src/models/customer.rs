//! Customer model
//!
//! Represents a customer record with its uniqueness-sensitive fields (cpf,
//! email) and the enabled flag used for soft deletion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Customer entity
///
/// Customers are never physically removed by the disable operation; instead
/// `enabled` is flipped to `false`. The cpf is unique across all customers,
/// enabled or not, and so is the email when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier, assigned by the database
    pub id: i64,

    /// Customer name
    pub name: String,

    /// Brazilian taxpayer id, 11 digits, unique
    pub cpf: String,

    /// Email address, unique when present
    pub email: Option<String>,

    /// Phone number, 11 digits when present
    pub phone: Option<String>,

    /// Soft-delete flag; `false` means disabled
    pub enabled: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Check if the customer is still active
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for Customer {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: String::new(),
            cpf: String::new(),
            email: None,
            phone: None,
            enabled: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a customer
///
/// Holds only the fields the caller explicitly supplied. Absent fields are
/// `None` and are neither validated for format nor applied to the entity.
#[derive(Debug, Clone, Default)]
pub struct CustomerChanges {
    pub name: Option<String>,
    pub cpf: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl CustomerChanges {
    /// True when no field was supplied
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.cpf.is_none() && self.email.is_none() && self.phone.is_none()
    }

    /// Merge the supplied fields into the entity, leaving the rest untouched
    pub fn apply_to(&self, customer: &mut Customer) {
        if let Some(name) = &self.name {
            customer.name = name.clone();
        }
        if let Some(cpf) = &self.cpf {
            customer.cpf = cpf.clone();
        }
        if let Some(email) = &self.email {
            customer.email = Some(email.clone());
        }
        if let Some(phone) = &self.phone {
            customer.phone = Some(phone.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_customer_is_enabled() {
        let customer = Customer::default();
        assert!(customer.is_enabled());
        assert_eq!(customer.id, 0);
    }

    #[test]
    fn test_changes_apply_only_supplied_fields() {
        let mut customer = Customer {
            name: "Ana".to_string(),
            cpf: "11122233396".to_string(),
            email: Some("ana@example.com".to_string()),
            phone: None,
            ..Default::default()
        };

        let changes = CustomerChanges {
            name: Some("Ana Souza".to_string()),
            ..Default::default()
        };
        changes.apply_to(&mut customer);

        assert_eq!(customer.name, "Ana Souza");
        assert_eq!(customer.cpf, "11122233396");
        assert_eq!(customer.email.as_deref(), Some("ana@example.com"));
        assert!(customer.phone.is_none());
    }

    #[test]
    fn test_changes_is_empty() {
        assert!(CustomerChanges::default().is_empty());
        assert!(!CustomerChanges {
            phone: Some("11987654321".to_string()),
            ..Default::default()
        }
        .is_empty());
    }
}
