//! Customer repository implementation
//!
//! Provides PostgreSQL-backed storage for customer entities, including the
//! uniqueness probes used by the service-layer validation and the filtered
//! search behind the listing endpoint.

use gestao_core::{
    models::Customer,
    traits::{CustomerFilter, CustomerRepository, Repository},
    AppError, AppResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, error, instrument};

const CUSTOMER_COLUMNS: &str = "id, name, cpf, email, phone, enabled, created_at, updated_at";

/// PostgreSQL implementation of CustomerRepository
pub struct PgCustomerRepository {
    pool: PgPool,
}

impl PgCustomerRepository {
    /// Create a new customer repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append the filter's equality conditions with bound parameters
    fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &CustomerFilter) {
        if let Some(email) = &filter.email {
            qb.push(" AND email = ").push_bind(email.clone());
        }
        if let Some(cpf) = &filter.cpf {
            qb.push(" AND cpf = ").push_bind(cpf.clone());
        }
        if let Some(phone) = &filter.phone {
            qb.push(" AND phone = ").push_bind(phone.clone());
        }
        if let Some(enabled) = filter.enabled {
            qb.push(" AND enabled = ").push_bind(enabled);
        }
    }
}

#[async_trait]
impl Repository<Customer, i64> for PgCustomerRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Customer>> {
        debug!("Finding customer by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, CustomerRow>(&format!(
            "SELECT {} FROM customers WHERE id = $1",
            CUSTOMER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding customer {}: {}", id, e);
            AppError::Database(format!("Failed to find customer: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Customer) -> AppResult<Customer> {
        debug!("Creating customer");

        let row = sqlx::query_as::<sqlx::Postgres, CustomerRow>(&format!(
            r#"
            INSERT INTO customers (name, cpf, email, phone, enabled, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        ))
        .bind(&entity.name)
        .bind(&entity.cpf)
        .bind(&entity.email)
        .bind(&entity.phone)
        .bind(entity.enabled)
        .bind(entity.created_at)
        .bind(entity.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating customer: {}", e);
            if e.to_string().contains("unique constraint") {
                AppError::Conflict("Customer cpf or email already exists".to_string())
            } else {
                AppError::Database(format!("Failed to create customer: {}", e))
            }
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &Customer) -> AppResult<Customer> {
        debug!("Updating customer: {}", entity.id);

        let row = sqlx::query_as::<sqlx::Postgres, CustomerRow>(&format!(
            r#"
            UPDATE customers
            SET name = $2,
                cpf = $3,
                email = $4,
                phone = $5,
                enabled = $6,
                updated_at = $7
            WHERE id = $1
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        ))
        .bind(entity.id)
        .bind(&entity.name)
        .bind(&entity.cpf)
        .bind(&entity.email)
        .bind(&entity.phone)
        .bind(entity.enabled)
        .bind(entity.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating customer {}: {}", entity.id, e);
            if e.to_string().contains("unique constraint") {
                AppError::Conflict("Customer cpf or email already exists".to_string())
            } else {
                AppError::Database(format!("Failed to update customer: {}", e))
            }
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> AppResult<bool> {
        debug!("Deleting customer: {}", id);

        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting customer {}: {}", id, e);
                AppError::Database(format!("Failed to delete customer: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    #[instrument(skip(self))]
    async fn exists_by_cpf(&self, cpf: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM customers WHERE cpf = $1)")
                .bind(cpf)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    error!("Database error checking cpf existence: {}", e);
                    AppError::Database(format!("Failed to check cpf: {}", e))
                })?;

        Ok(exists)
    }

    #[instrument(skip(self))]
    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM customers WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    error!("Database error checking email existence: {}", e);
                    AppError::Database(format!("Failed to check email: {}", e))
                })?;

        Ok(exists)
    }

    #[instrument(skip(self, filter))]
    async fn search(
        &self,
        filter: &CustomerFilter,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Customer>, i64)> {
        debug!(
            "Searching customers with filter {:?}, limit {}, offset {}",
            filter, limit, offset
        );

        let mut count_qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM customers WHERE 1=1");
        Self::push_filter(&mut count_qb, filter);

        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting customers: {}", e);
                AppError::Database(format!("Failed to count customers: {}", e))
            })?;

        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT {} FROM customers WHERE 1=1",
            CUSTOMER_COLUMNS
        ));
        Self::push_filter(&mut qb, filter);
        qb.push(" ORDER BY id LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows: Vec<CustomerRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error searching customers: {}", e);
                AppError::Database(format!("Failed to search customers: {}", e))
            })?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i64,
    name: String,
    cpf: String,
    email: Option<String>,
    phone: Option<String>,
    enabled: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            cpf: row.cpf,
            email: row.email,
            phone: row.phone,
            enabled: row.enabled,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
