//! Customer service
//!
//! Orchestrates customer creation, partial updates, search, and the two
//! removal paths (hard delete and disable-as-soft-delete). All admissibility
//! rules live here; repositories only persist.

use crate::validation::{is_valid_cpf, is_valid_email, is_valid_phone};
use chrono::Utc;
use gestao_core::{
    models::{Customer, CustomerChanges},
    traits::{CustomerFilter, CustomerRepository, Pagination},
    AppError, AppResult,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Customer service
///
/// Generic over the repository so tests can substitute an in-memory
/// implementation.
pub struct CustomerService<R> {
    repo: Arc<R>,
}

impl<R> Clone for CustomerService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<R: CustomerRepository> CustomerService<R> {
    /// Create a new customer service
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Create a customer after validating the full rule set
    ///
    /// The candidate's `enabled` flag and timestamps are always stamped here,
    /// regardless of what the caller supplied.
    #[instrument(skip(self, candidate))]
    pub async fn create_customer(&self, mut candidate: Customer) -> AppResult<Customer> {
        info!("Starting creation of customer");

        self.validate_create(&candidate).await?;

        let now = Utc::now();
        candidate.enabled = true;
        candidate.created_at = now;
        candidate.updated_at = now;

        let saved = self.repo.create(&candidate).await?;
        info!(id = saved.id, "Customer saved successfully");
        Ok(saved)
    }

    async fn validate_create(&self, candidate: &Customer) -> AppResult<()> {
        if candidate.name.trim().is_empty() {
            warn!("Customer name not provided");
            return Err(AppError::Invalid("Customer name is required".to_string()));
        }
        if candidate.cpf.trim().is_empty() {
            warn!("Cpf not provided for the customer");
            return Err(AppError::Invalid("Customer cpf is required".to_string()));
        }
        if !is_valid_cpf(&candidate.cpf) {
            warn!("Invalid cpf detected");
            return Err(AppError::Invalid("Customer cpf is invalid".to_string()));
        }
        if self.repo.exists_by_cpf(&candidate.cpf).await? {
            warn!("Cpf already exists in the system");
            return Err(AppError::Conflict(
                "Customer cpf already exists".to_string(),
            ));
        }
        if let Some(email) = &candidate.email {
            if !is_valid_email(email) {
                warn!("Invalid email format detected");
                return Err(AppError::Invalid(
                    "Customer email format is invalid".to_string(),
                ));
            }
            if self.repo.exists_by_email(email).await? {
                warn!("Email already exists in the system");
                return Err(AppError::Conflict(
                    "Customer email already exists".to_string(),
                ));
            }
        }
        if let Some(phone) = &candidate.phone {
            if !is_valid_phone(phone) {
                warn!("Invalid phone format detected");
                return Err(AppError::Invalid(
                    "Customer phone format is invalid. Use the format with 11 numbers: XXXXXXXXXXX"
                        .to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Find a customer by id
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> AppResult<Customer> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))
    }

    /// Search customers with the optional equality filter set, paged
    #[instrument(skip(self, filter))]
    pub async fn search(
        &self,
        filter: &CustomerFilter,
        page: &Pagination,
    ) -> AppResult<(Vec<Customer>, i64)> {
        info!(
            page = page.page,
            per_page = page.per_page,
            "Customer search query started"
        );
        self.repo.search(filter, page.limit(), page.offset()).await
    }

    /// Apply a partial update to an existing customer
    ///
    /// The changeset is validated against the currently persisted state
    /// before any field is merged; supplying a field equal to its current
    /// value never triggers a conflict.
    #[instrument(skip(self, changes))]
    pub async fn update_customer(&self, id: i64, changes: CustomerChanges) -> AppResult<Customer> {
        info!(id, "Starting update of customer");

        let mut customer = self.find_by_id(id).await?;
        self.validate_update(&customer, &changes).await?;
        changes.apply_to(&mut customer);
        customer.updated_at = Utc::now();

        let updated = self.repo.update(&customer).await?;
        info!(id = updated.id, "Customer updated successfully");
        Ok(updated)
    }

    async fn validate_update(
        &self,
        current: &Customer,
        changes: &CustomerChanges,
    ) -> AppResult<()> {
        if let Some(name) = &changes.name {
            if name.trim().is_empty() {
                warn!("Customer name is empty");
                return Err(AppError::Invalid("Customer name is required".to_string()));
            }
        }
        if let Some(email) = &changes.email {
            if current.email.as_deref() != Some(email.as_str()) {
                if !is_valid_email(email) {
                    warn!("Invalid email format detected");
                    return Err(AppError::Invalid(
                        "Customer email format is invalid".to_string(),
                    ));
                }
                if self.repo.exists_by_email(email).await? {
                    warn!("Email already exists in the system");
                    return Err(AppError::Conflict(
                        "Customer email already exists".to_string(),
                    ));
                }
            }
        }
        if let Some(cpf) = &changes.cpf {
            if cpf != &current.cpf {
                if !is_valid_cpf(cpf) {
                    warn!(id = current.id, "Invalid cpf format detected");
                    return Err(AppError::Invalid("Customer cpf is invalid".to_string()));
                }
                if self.repo.exists_by_cpf(cpf).await? {
                    warn!("Cpf already exists in the system");
                    return Err(AppError::Conflict(
                        "Customer cpf already exists".to_string(),
                    ));
                }
            }
        }
        if let Some(phone) = &changes.phone {
            if !is_valid_phone(phone) {
                warn!("Invalid phone format detected");
                return Err(AppError::Invalid(
                    "Customer phone format is invalid. Use the format with 11 numbers: XXXXXXXXXXX"
                        .to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Soft-delete a customer by flipping the enabled flag
    ///
    /// Disabling an already-disabled customer is an invalid transition.
    #[instrument(skip(self))]
    pub async fn disable_customer(&self, id: i64) -> AppResult<()> {
        info!(id, "Starting the disable process for customer");

        let mut customer = self.find_by_id(id).await?;
        if !customer.enabled {
            warn!(id, "Customer is already disabled in the system");
            return Err(AppError::Invalid(
                "Customer is already disabled".to_string(),
            ));
        }

        customer.enabled = false;
        customer.updated_at = Utc::now();
        self.repo.update(&customer).await?;

        info!(id, "Customer was successfully disabled");
        Ok(())
    }

    /// Hard-delete a customer row
    #[instrument(skip(self))]
    pub async fn delete_customer(&self, id: i64) -> AppResult<()> {
        info!(id, "Starting the delete process for customer");

        let customer = self.find_by_id(id).await?;
        self.repo.delete(customer.id).await?;

        info!(id, "Customer was successfully deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemCustomerRepository;

    fn service() -> CustomerService<MemCustomerRepository> {
        CustomerService::new(Arc::new(MemCustomerRepository::new()))
    }

    fn candidate(name: &str, cpf: &str) -> Customer {
        Customer {
            name: name.to_string(),
            cpf: cpf.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_customer_with_valid_data_succeeds() {
        let service = service();

        let created = service
            .create_customer(candidate("Ana", "11122233396"))
            .await
            .unwrap();

        assert!(created.id > 0);
        assert!(created.enabled);
        assert_eq!(created.name, "Ana");
        assert_eq!(created.cpf, "11122233396");
        assert!(created.email.is_none());
        assert!(created.phone.is_none());
    }

    #[tokio::test]
    async fn create_customer_with_duplicate_cpf_conflicts() {
        let service = service();
        service
            .create_customer(candidate("Ana", "11122233396"))
            .await
            .unwrap();

        let result = service
            .create_customer(candidate("Outra Ana", "11122233396"))
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn create_customer_with_duplicate_email_conflicts() {
        let service = service();
        let mut first = candidate("Ana", "11122233396");
        first.email = Some("ana@example.com".to_string());
        service.create_customer(first).await.unwrap();

        let mut second = candidate("Bia", "52998224725");
        second.email = Some("ana@example.com".to_string());
        let result = service.create_customer(second).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn create_customer_with_blank_name_is_invalid() {
        let service = service();

        let result = service.create_customer(candidate("   ", "11122233396")).await;

        assert!(matches!(result, Err(AppError::Invalid(_))));
    }

    #[tokio::test]
    async fn create_customer_with_bad_cpf_checksum_is_invalid() {
        let service = service();

        let result = service.create_customer(candidate("Ana", "11122233397")).await;

        assert!(matches!(result, Err(AppError::Invalid(_))));
    }

    #[tokio::test]
    async fn create_customer_with_bad_email_is_invalid() {
        let service = service();
        let mut c = candidate("Ana", "11122233396");
        c.email = Some("not-an-email".to_string());

        let result = service.create_customer(c).await;

        assert!(matches!(result, Err(AppError::Invalid(_))));
    }

    #[tokio::test]
    async fn create_customer_with_bad_phone_is_invalid() {
        let service = service();
        let mut c = candidate("Ana", "11122233396");
        c.phone = Some("12345".to_string());

        let result = service.create_customer(c).await;

        assert!(matches!(result, Err(AppError::Invalid(_))));
    }

    #[tokio::test]
    async fn find_by_id_missing_customer_is_not_found() {
        let service = service();

        let result = service.find_by_id(999).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_customer_merges_only_supplied_fields() {
        let service = service();
        let mut c = candidate("Ana", "11122233396");
        c.email = Some("ana@example.com".to_string());
        let created = service.create_customer(c).await.unwrap();

        let updated = service
            .update_customer(
                created.id,
                CustomerChanges {
                    name: Some("Ana Souza".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Ana Souza");
        assert_eq!(updated.cpf, "11122233396");
        assert_eq!(updated.email.as_deref(), Some("ana@example.com"));
    }

    #[tokio::test]
    async fn update_customer_with_blank_name_is_invalid() {
        let service = service();
        let created = service
            .create_customer(candidate("Ana", "11122233396"))
            .await
            .unwrap();

        let result = service
            .update_customer(
                created.id,
                CustomerChanges {
                    name: Some("  ".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Invalid(_))));
    }

    #[tokio::test]
    async fn update_customer_keeping_own_cpf_never_conflicts() {
        let service = service();
        let created = service
            .create_customer(candidate("Ana", "11122233396"))
            .await
            .unwrap();

        // The cpf already exists in the store (it is this customer's own),
        // but self-comparison excludes it from the uniqueness check.
        let updated = service
            .update_customer(
                created.id,
                CustomerChanges {
                    cpf: Some("11122233396".to_string()),
                    name: Some("Ana Maria".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.cpf, "11122233396");
        assert_eq!(updated.name, "Ana Maria");
    }

    #[tokio::test]
    async fn update_customer_to_taken_cpf_conflicts() {
        let service = service();
        service
            .create_customer(candidate("Ana", "11122233396"))
            .await
            .unwrap();
        let other = service
            .create_customer(candidate("Bia", "52998224725"))
            .await
            .unwrap();

        let result = service
            .update_customer(
                other.id,
                CustomerChanges {
                    cpf: Some("11122233396".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn update_customer_to_taken_email_conflicts() {
        let service = service();
        let mut first = candidate("Ana", "11122233396");
        first.email = Some("ana@example.com".to_string());
        service.create_customer(first).await.unwrap();
        let other = service
            .create_customer(candidate("Bia", "52998224725"))
            .await
            .unwrap();

        let result = service
            .update_customer(
                other.id,
                CustomerChanges {
                    email: Some("ana@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn update_missing_customer_is_not_found() {
        let service = service();

        let result = service
            .update_customer(
                42,
                CustomerChanges {
                    name: Some("Ana".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn disable_customer_twice_fails_the_second_time() {
        let service = service();
        let created = service
            .create_customer(candidate("Ana", "11122233396"))
            .await
            .unwrap();

        service.disable_customer(created.id).await.unwrap();
        let found = service.find_by_id(created.id).await.unwrap();
        assert!(!found.enabled);

        let second = service.disable_customer(created.id).await;
        assert!(matches!(second, Err(AppError::Invalid(_))));
    }

    #[tokio::test]
    async fn delete_customer_removes_the_row() {
        let service = service();
        let created = service
            .create_customer(candidate("Ana", "11122233396"))
            .await
            .unwrap();

        service.delete_customer(created.id).await.unwrap();

        let result = service.find_by_id(created.id).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_missing_customer_is_not_found() {
        let service = service();

        let result = service.delete_customer(999).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn search_applies_only_supplied_filters() {
        let service = service();
        let mut ana = candidate("Ana", "11122233396");
        ana.email = Some("ana@example.com".to_string());
        let ana = service.create_customer(ana).await.unwrap();
        let bia = service
            .create_customer(candidate("Bia", "52998224725"))
            .await
            .unwrap();
        service.disable_customer(bia.id).await.unwrap();

        let page = Pagination::new(1, 50);

        // No filter: everything comes back, disabled included
        let (all, total) = service
            .search(&CustomerFilter::default(), &page)
            .await
            .unwrap();
        assert_eq!(total, 2);
        assert_eq!(all.len(), 2);

        // Enabled filter
        let (enabled_only, total) = service
            .search(
                &CustomerFilter {
                    enabled: Some(true),
                    ..Default::default()
                },
                &page,
            )
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(enabled_only[0].id, ana.id);

        // Email equality filter
        let (by_email, _) = service
            .search(
                &CustomerFilter {
                    email: Some("ana@example.com".to_string()),
                    ..Default::default()
                },
                &page,
            )
            .await
            .unwrap();
        assert_eq!(by_email.len(), 1);
        assert_eq!(by_email[0].id, ana.id);
    }
}
