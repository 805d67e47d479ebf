//! Account repository implementation
//!
//! Provides PostgreSQL-backed storage for account entities with owner-scoped
//! listing. The situation is stored as its text label.

use gestao_core::{
    models::{Account, Situation},
    traits::{AccountRepository, Repository},
    AppError, AppResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};

const ACCOUNT_COLUMNS: &str =
    "id, reference, value, situation, customer_id, created_at, updated_at";

/// PostgreSQL implementation of AccountRepository
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    /// Create a new account repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Convert database situation string to enum
    fn parse_situation(s: &str) -> Situation {
        Situation::from_str(s).unwrap_or(Situation::Pending)
    }
}

#[async_trait]
impl Repository<Account, i64> for PgAccountRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Account>> {
        debug!("Finding account by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, AccountRow>(&format!(
            "SELECT {} FROM accounts WHERE id = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding account {}: {}", id, e);
            AppError::Database(format!("Failed to find account: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Account) -> AppResult<Account> {
        debug!("Creating account for customer {}", entity.customer_id);

        let row = sqlx::query_as::<sqlx::Postgres, AccountRow>(&format!(
            r#"
            INSERT INTO accounts (reference, value, situation, customer_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            ACCOUNT_COLUMNS
        ))
        .bind(&entity.reference)
        .bind(entity.value)
        .bind(entity.situation.to_string())
        .bind(entity.customer_id)
        .bind(entity.created_at)
        .bind(entity.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating account: {}", e);
            AppError::Database(format!("Failed to create account: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &Account) -> AppResult<Account> {
        debug!("Updating account: {}", entity.id);

        let row = sqlx::query_as::<sqlx::Postgres, AccountRow>(&format!(
            r#"
            UPDATE accounts
            SET reference = $2,
                value = $3,
                situation = $4,
                updated_at = $5
            WHERE id = $1
            RETURNING {}
            "#,
            ACCOUNT_COLUMNS
        ))
        .bind(entity.id)
        .bind(&entity.reference)
        .bind(entity.value)
        .bind(entity.situation.to_string())
        .bind(entity.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating account {}: {}", entity.id, e);
            AppError::Database(format!("Failed to update account: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> AppResult<bool> {
        debug!("Deleting account row: {}", id);

        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting account {}: {}", id, e);
                AppError::Database(format!("Failed to delete account: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    #[instrument(skip(self))]
    async fn find_by_customer(
        &self,
        customer_id: i64,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Account>, i64)> {
        debug!(
            "Listing accounts for customer {} with limit {} offset {}",
            customer_id, limit, offset
        );

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE customer_id = $1")
                .bind(customer_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    error!("Database error counting accounts: {}", e);
                    AppError::Database(format!("Failed to count accounts: {}", e))
                })?;

        let rows = sqlx::query_as::<sqlx::Postgres, AccountRow>(&format!(
            r#"
            SELECT {}
            FROM accounts
            WHERE customer_id = $1
            ORDER BY id
            LIMIT $2 OFFSET $3
            "#,
            ACCOUNT_COLUMNS
        ))
        .bind(customer_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing accounts: {}", e);
            AppError::Database(format!("Failed to fetch accounts: {}", e))
        })?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: i64,
    reference: String,
    value: Decimal,
    situation: String,
    customer_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Self {
            id: row.id,
            reference: row.reference,
            value: row.value,
            situation: PgAccountRepository::parse_situation(&row.situation),
            customer_id: row.customer_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
