//! In-memory repository implementations for service tests
//!
//! These doubles store entities in a HashMap behind an async RwLock and
//! assign sequential ids on create, mimicking the database repositories
//! without any external dependency.

use async_trait::async_trait;
use gestao_core::{
    models::{Account, Customer},
    traits::{AccountRepository, CustomerFilter, CustomerRepository, Repository},
    AppError, AppResult,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

/// In-memory customer repository
pub struct MemCustomerRepository {
    rows: RwLock<HashMap<i64, Customer>>,
    next_id: AtomicI64,
}

impl MemCustomerRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl Repository<Customer, i64> for MemCustomerRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Customer>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn create(&self, entity: &Customer) -> AppResult<Customer> {
        let mut saved = entity.clone();
        saved.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.rows.write().await.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn update(&self, entity: &Customer) -> AppResult<Customer> {
        let mut rows = self.rows.write().await;
        if !rows.contains_key(&entity.id) {
            return Err(AppError::Database(format!(
                "customer {} does not exist",
                entity.id
            )));
        }
        rows.insert(entity.id, entity.clone());
        Ok(entity.clone())
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.rows.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl CustomerRepository for MemCustomerRepository {
    async fn exists_by_cpf(&self, cpf: &str) -> AppResult<bool> {
        Ok(self.rows.read().await.values().any(|c| c.cpf == cpf))
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .any(|c| c.email.as_deref() == Some(email)))
    }

    async fn search(
        &self,
        filter: &CustomerFilter,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Customer>, i64)> {
        let rows = self.rows.read().await;
        let mut matches: Vec<Customer> = rows
            .values()
            .filter(|c| {
                if let Some(email) = &filter.email {
                    if c.email.as_deref() != Some(email.as_str()) {
                        return false;
                    }
                }
                if let Some(cpf) = &filter.cpf {
                    if &c.cpf != cpf {
                        return false;
                    }
                }
                if let Some(phone) = &filter.phone {
                    if c.phone.as_deref() != Some(phone.as_str()) {
                        return false;
                    }
                }
                if let Some(enabled) = filter.enabled {
                    if c.enabled != enabled {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();
        matches.sort_by_key(|c| c.id);

        let total = matches.len() as i64;
        let page: Vec<Customer> = matches
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();

        Ok((page, total))
    }
}

/// In-memory account repository
pub struct MemAccountRepository {
    rows: RwLock<HashMap<i64, Account>>,
    next_id: AtomicI64,
}

impl MemAccountRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl Repository<Account, i64> for MemAccountRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Account>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn create(&self, entity: &Account) -> AppResult<Account> {
        let mut saved = entity.clone();
        saved.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.rows.write().await.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn update(&self, entity: &Account) -> AppResult<Account> {
        let mut rows = self.rows.write().await;
        if !rows.contains_key(&entity.id) {
            return Err(AppError::Database(format!(
                "account {} does not exist",
                entity.id
            )));
        }
        rows.insert(entity.id, entity.clone());
        Ok(entity.clone())
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.rows.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl AccountRepository for MemAccountRepository {
    async fn find_by_customer(
        &self,
        customer_id: i64,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Account>, i64)> {
        let rows = self.rows.read().await;
        let mut matches: Vec<Account> = rows
            .values()
            .filter(|a| a.customer_id == customer_id)
            .cloned()
            .collect();
        matches.sort_by_key(|a| a.id);

        let total = matches.len() as i64;
        let page: Vec<Account> = matches
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();

        Ok((page, total))
    }
}
