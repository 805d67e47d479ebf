//! Account DTOs
//!
//! Request and response types for account management endpoints.

use chrono::{DateTime, Utc};
use gestao_core::models::{Account, AccountChanges, Situation};
use gestao_core::{AppError, AppResult};
use gestao_services::validation::is_valid_reference;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Account creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AccountCreateRequest {
    /// Billing reference in `MM-YYYY` format
    #[validate(length(min = 1, message = "Reference is required"))]
    pub reference: String,

    /// Monetary amount, non-negative
    pub value: Decimal,

    /// Initial situation label (`PENDENTE` or `PAGA`; case-insensitive)
    pub situation: String,
}

impl AccountCreateRequest {
    /// Convert to Account entity
    ///
    /// The owner and timestamps are assigned by the service; this validates
    /// the wire-level formats and parses the situation label.
    pub fn to_account(&self) -> AppResult<Account> {
        if !is_valid_reference(&self.reference) {
            return Err(AppError::Invalid(
                "Invalid reference format. Expected MM-YYYY".to_string(),
            ));
        }
        if self.value < Decimal::ZERO {
            return Err(AppError::Invalid(
                "The account value cannot be negative".to_string(),
            ));
        }
        let situation = parse_situation(&self.situation)?;

        Ok(Account {
            reference: self.reference.clone(),
            value: self.value,
            situation,
            ..Default::default()
        })
    }
}

/// Account partial update request
///
/// Absent fields are left untouched on the stored record.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AccountUpdateRequest {
    /// New billing reference
    pub reference: Option<String>,

    /// New monetary amount
    pub value: Option<Decimal>,

    /// New situation label
    pub situation: Option<String>,
}

impl AccountUpdateRequest {
    /// Convert to the service-layer changeset
    pub fn to_changes(&self) -> AppResult<AccountChanges> {
        if let Some(reference) = &self.reference {
            if !is_valid_reference(reference) {
                return Err(AppError::Invalid(
                    "Invalid reference format. Expected MM-YYYY".to_string(),
                ));
            }
        }

        let situation = match &self.situation {
            Some(label) => Some(parse_situation(label)?),
            None => None,
        };

        Ok(AccountChanges {
            reference: self.reference.clone(),
            value: self.value,
            situation,
        })
    }
}

fn parse_situation(label: &str) -> AppResult<Situation> {
    Situation::from_str(label).ok_or_else(|| {
        AppError::Invalid(format!(
            "Invalid situation: {}. Valid values are: PENDENTE, PAGA, CANCELADA",
            label
        ))
    })
}

/// Account response
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    /// Account ID
    pub id: i64,

    /// Billing reference
    pub reference: String,

    /// Monetary amount
    pub value: Decimal,

    /// Situation label
    pub situation: String,

    /// Owning customer
    pub customer_id: i64,

    /// Created timestamp
    pub created_at: DateTime<Utc>,

    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            reference: account.reference,
            value: account.value,
            situation: account.situation.to_string(),
            customer_id: account.customer_id,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_create_request_to_account() {
        let req = AccountCreateRequest {
            reference: "06-2025".to_string(),
            value: dec!(250.00),
            situation: "PENDENTE".to_string(),
        };

        let account = req.to_account().unwrap();
        assert_eq!(account.reference, "06-2025");
        assert_eq!(account.value, dec!(250.00));
        assert_eq!(account.situation, Situation::Pending);
        assert_eq!(account.customer_id, 0);
    }

    #[test]
    fn test_create_request_accepts_lowercase_situation() {
        let req = AccountCreateRequest {
            reference: "06-2025".to_string(),
            value: dec!(10.00),
            situation: "paga".to_string(),
        };

        let account = req.to_account().unwrap();
        assert_eq!(account.situation, Situation::Paid);
    }

    #[test]
    fn test_create_request_rejects_bad_reference() {
        let req = AccountCreateRequest {
            reference: "13-2025".to_string(),
            value: dec!(10.00),
            situation: "PENDENTE".to_string(),
        };

        assert!(matches!(req.to_account(), Err(AppError::Invalid(_))));
    }

    #[test]
    fn test_create_request_rejects_negative_value() {
        let req = AccountCreateRequest {
            reference: "06-2025".to_string(),
            value: dec!(-0.01),
            situation: "PENDENTE".to_string(),
        };

        assert!(matches!(req.to_account(), Err(AppError::Invalid(_))));
    }

    #[test]
    fn test_create_request_rejects_unknown_situation() {
        let req = AccountCreateRequest {
            reference: "06-2025".to_string(),
            value: dec!(10.00),
            situation: "PAID".to_string(),
        };

        assert!(matches!(req.to_account(), Err(AppError::Invalid(_))));
    }

    #[test]
    fn test_update_request_to_changes() {
        let req = AccountUpdateRequest {
            situation: Some("CANCELADA".to_string()),
            ..Default::default()
        };

        let changes = req.to_changes().unwrap();
        assert_eq!(changes.situation, Some(Situation::Cancelled));
        assert!(changes.reference.is_none());
        assert!(changes.value.is_none());
    }

    #[test]
    fn test_account_response_from_account() {
        let account = Account {
            id: 7,
            reference: "06-2025".to_string(),
            value: dec!(250.00),
            situation: Situation::Pending,
            customer_id: 1,
            ..Default::default()
        };

        let response = AccountResponse::from(account);
        assert_eq!(response.id, 7);
        assert_eq!(response.situation, "PENDENTE");
        assert_eq!(response.customer_id, 1);
    }
}
