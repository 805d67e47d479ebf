//! Account service
//!
//! Orchestrates account creation, partial updates, owner-scoped listing, and
//! the cancel-as-delete transition. Enforces the terminal CANCELLED state:
//! cancelled accounts accept no further updates, and an account can never be
//! created already cancelled.

use crate::customer::CustomerService;
use chrono::Utc;
use gestao_core::{
    models::{Account, AccountChanges, Situation},
    traits::{AccountRepository, CustomerRepository, Pagination},
    AppError, AppResult,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Account service
///
/// Owner resolution goes through the customer service, so a missing customer
/// surfaces as the same NotFound the customer endpoints raise.
pub struct AccountService<A, C> {
    repo: Arc<A>,
    customers: Arc<CustomerService<C>>,
}

impl<A, C> AccountService<A, C>
where
    A: AccountRepository,
    C: CustomerRepository,
{
    /// Create a new account service
    pub fn new(repo: Arc<A>, customers: Arc<CustomerService<C>>) -> Self {
        Self { repo, customers }
    }

    /// Create an account owned by the given customer
    #[instrument(skip(self, candidate))]
    pub async fn create_account(
        &self,
        mut candidate: Account,
        customer_id: i64,
    ) -> AppResult<Account> {
        let customer = self.customers.find_by_id(customer_id).await?;
        candidate.customer_id = customer.id;

        if candidate.situation.is_terminal() {
            warn!("Attempt to create an account in a terminal situation");
            return Err(AppError::Invalid(
                "An account cannot be created in the cancelled situation".to_string(),
            ));
        }

        let now = Utc::now();
        candidate.created_at = now;
        candidate.updated_at = now;

        let saved = self.repo.create(&candidate).await?;
        info!(id = saved.id, customer_id, "Account created successfully");
        Ok(saved)
    }

    /// Find an account by id
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> AppResult<Account> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".to_string()))
    }

    /// List the accounts owned by a customer, paged
    #[instrument(skip(self))]
    pub async fn find_by_customer(
        &self,
        customer_id: i64,
        page: &Pagination,
    ) -> AppResult<(Vec<Account>, i64)> {
        let customer = self.customers.find_by_id(customer_id).await?;
        self.repo
            .find_by_customer(customer.id, page.limit(), page.offset())
            .await
    }

    /// Apply a partial update to an existing account
    ///
    /// Cancelled accounts are immutable; a supplied negative value is
    /// rejected before anything is merged.
    #[instrument(skip(self, changes))]
    pub async fn update_account(&self, id: i64, changes: AccountChanges) -> AppResult<Account> {
        let mut account = self.find_by_id(id).await?;
        Self::validate_update(&account, &changes)?;

        changes.apply_to(&mut account);
        account.updated_at = Utc::now();

        let updated = self.repo.update(&account).await?;
        info!(id = updated.id, "Account updated successfully");
        Ok(updated)
    }

    fn validate_update(account: &Account, changes: &AccountChanges) -> AppResult<()> {
        if !account.situation.accepts_updates() {
            warn!(id = account.id, "Attempt to update a cancelled account");
            return Err(AppError::Unauthorized(
                "Cancelled accounts cannot be updated".to_string(),
            ));
        }
        if let Some(value) = changes.value {
            if value < Decimal::ZERO {
                warn!(id = account.id, "Negative value supplied on update");
                return Err(AppError::Invalid(
                    "The account value cannot be negative".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Cancel an account (the only deletion path)
    ///
    /// Forces the situation to CANCELLED and persists; the row is never
    /// physically removed.
    #[instrument(skip(self))]
    pub async fn delete_account(&self, id: i64) -> AppResult<()> {
        let mut account = self.find_by_id(id).await?;

        account.situation = Situation::Cancelled;
        account.updated_at = Utc::now();
        self.repo.update(&account).await?;

        info!(id, "Account was successfully cancelled");
        Ok(())
    }
}
