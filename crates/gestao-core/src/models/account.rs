//! Account model
//!
//! Represents billing entries owned by a customer. An account moves through a
//! small state machine where the cancelled situation is terminal.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account situation enumeration
///
/// Wire and storage labels keep the original API contract
/// (`PENDENTE` / `PAGA` / `CANCELADA`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Situation {
    /// Awaiting payment
    #[default]
    #[serde(rename = "PENDENTE")]
    Pending,
    /// Paid
    #[serde(rename = "PAGA")]
    Paid,
    /// Cancelled - terminal, the account accepts no further updates
    #[serde(rename = "CANCELADA")]
    Cancelled,
}

impl fmt::Display for Situation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Situation::Pending => write!(f, "PENDENTE"),
            Situation::Paid => write!(f, "PAGA"),
            Situation::Cancelled => write!(f, "CANCELADA"),
        }
    }
}

impl Situation {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PENDENTE" => Some(Situation::Pending),
            "PAGA" => Some(Situation::Paid),
            "CANCELADA" => Some(Situation::Cancelled),
            _ => None,
        }
    }

    /// Check if this situation is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Situation::Cancelled)
    }

    /// Check if an account in this situation accepts field updates
    pub fn accepts_updates(&self) -> bool {
        !self.is_terminal()
    }
}

/// Account entity
///
/// Soft deletion is expressed through the state machine: deleting an account
/// forces `situation` to `Cancelled` instead of removing the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier, assigned by the database
    pub id: i64,

    /// Billing reference in `MM-YYYY` format
    pub reference: String,

    /// Monetary amount, never negative
    pub value: Decimal,

    /// Current situation
    pub situation: Situation,

    /// Owning customer, set at creation and immutable afterwards
    pub customer_id: i64,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Check if the account has been cancelled
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.situation.is_terminal()
    }
}

impl Default for Account {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            reference: String::new(),
            value: Decimal::ZERO,
            situation: Situation::Pending,
            customer_id: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for an account
///
/// Holds only the fields the caller explicitly supplied.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub reference: Option<String>,
    pub value: Option<Decimal>,
    pub situation: Option<Situation>,
}

impl AccountChanges {
    /// True when no field was supplied
    pub fn is_empty(&self) -> bool {
        self.reference.is_none() && self.value.is_none() && self.situation.is_none()
    }

    /// Merge the supplied fields into the entity, leaving the rest untouched
    pub fn apply_to(&self, account: &mut Account) {
        if let Some(reference) = &self.reference {
            account.reference = reference.clone();
        }
        if let Some(value) = self.value {
            account.value = value;
        }
        if let Some(situation) = self.situation {
            account.situation = situation;
        }
    }
}
