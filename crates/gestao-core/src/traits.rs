//! Common traits for repositories
//!
//! Defines abstractions for database access so the service layer can be
//! exercised against in-memory implementations in tests.

use crate::error::AppError;
use crate::models::{Account, Customer};
use async_trait::async_trait;
use serde::Serialize;

/// Generic repository trait for CRUD operations
#[async_trait]
pub trait Repository<T, ID>: Send + Sync {
    /// Find entity by ID
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, AppError>;

    /// Create a new entity
    async fn create(&self, entity: &T) -> Result<T, AppError>;

    /// Update an existing entity
    async fn update(&self, entity: &T) -> Result<T, AppError>;

    /// Delete entity by ID
    async fn delete(&self, id: ID) -> Result<bool, AppError>;
}

/// Equality filter set for customer searches
///
/// Absent fields are simply not applied; an empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    pub email: Option<String>,
    pub cpf: Option<String>,
    pub phone: Option<String>,
    pub enabled: Option<bool>,
}

impl CustomerFilter {
    /// True when no filter field was supplied
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.cpf.is_none() && self.phone.is_none() && self.enabled.is_none()
    }
}

/// Customer repository trait with uniqueness and search queries
#[async_trait]
pub trait CustomerRepository: Repository<Customer, i64> {
    /// Check whether any customer already holds this cpf
    async fn exists_by_cpf(&self, cpf: &str) -> Result<bool, AppError>;

    /// Check whether any customer already holds this email
    async fn exists_by_email(&self, email: &str) -> Result<bool, AppError>;

    /// Search customers matching the filter, paged, with total count
    async fn search(
        &self,
        filter: &CustomerFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Customer>, i64), AppError>;
}

/// Account repository trait with owner-scoped listing
#[async_trait]
pub trait AccountRepository: Repository<Account, i64> {
    /// List accounts owned by a customer, paged, with total count
    async fn find_by_customer(
        &self,
        customer_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Account>, i64), AppError>;
}

/// Pagination parameters
#[derive(Debug, Clone, Default)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, 1000),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(total: i64, page: i64, per_page: i64) -> Self {
        let total_pages = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };

        Self {
            total,
            page,
            per_page,
            total_pages,
        }
    }
}
