//! Account handlers
//!
//! HTTP handlers for account management endpoints. Account creation and
//! listing are nested under the owning customer; lookups, updates, and the
//! cancel-as-delete operation address accounts directly.

use crate::dto::account::{AccountCreateRequest, AccountResponse, AccountUpdateRequest};
use crate::dto::{ApiResponse, PaginationParams};
use crate::handlers::customer::customer_service;
use actix_web::{web, HttpResponse};
use gestao_core::traits::Pagination;
use gestao_core::AppError;
use gestao_db::{PgAccountRepository, PgCustomerRepository};
use gestao_services::AccountService;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use validator::Validate;

/// Build the account service backed by the shared pool
fn account_service(pool: &PgPool) -> AccountService<PgAccountRepository, PgCustomerRepository> {
    AccountService::new(
        Arc::new(PgAccountRepository::new(pool.clone())),
        Arc::new(customer_service(pool)),
    )
}

/// Create a new account owned by a customer
///
/// POST /api/v1/customers/{id}/accounts
#[instrument(skip(pool, req))]
pub async fn create_account(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    req: web::Json<AccountCreateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Account creation validation failed: {}", e);
        AppError::Invalid(e.to_string())
    })?;

    let customer_id = path.into_inner();
    debug!(customer_id, "Creating account");

    let service = account_service(pool.get_ref());
    let created = service.create_account(req.to_account()?, customer_id).await?;

    let response = AccountResponse::from(created);
    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        response,
        "Account created successfully",
    )))
}

/// List the accounts owned by a customer
///
/// GET /api/v1/customers/{id}/accounts
#[instrument(skip(pool))]
pub async fn list_customer_accounts(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    query.validate().map_err(|e| {
        warn!("Pagination validation failed: {}", e);
        AppError::Invalid(e.to_string())
    })?;

    let customer_id = path.into_inner();
    debug!(
        customer_id,
        page = query.page,
        per_page = query.per_page,
        "Listing customer accounts"
    );

    let service = account_service(pool.get_ref());
    let page = Pagination::new(query.page, query.per_page);
    let (accounts, total) = service.find_by_customer(customer_id, &page).await?;

    let response_data: Vec<AccountResponse> = accounts.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(query.paginate(response_data, total)))
}

/// Get a single account by ID
///
/// GET /api/v1/accounts/{id}
#[instrument(skip(pool))]
pub async fn get_account(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let account_id = path.into_inner();
    debug!(id = account_id, "Getting account");

    let service = account_service(pool.get_ref());
    let account = service.find_by_id(account_id).await?;

    let response = AccountResponse::from(account);
    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Apply a partial update to an account
///
/// PUT /api/v1/accounts/{id}
#[instrument(skip(pool, req))]
pub async fn update_account(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    req: web::Json<AccountUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    let account_id = path.into_inner();
    debug!(id = account_id, "Updating account");

    let service = account_service(pool.get_ref());
    let updated = service.update_account(account_id, req.to_changes()?).await?;

    let response = AccountResponse::from(updated);
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        response,
        "Account updated successfully",
    )))
}

/// Cancel an account (soft delete)
///
/// DELETE /api/v1/accounts/{id}
#[instrument(skip(pool))]
pub async fn delete_account(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let account_id = path.into_inner();
    debug!(id = account_id, "Cancelling account");

    let service = account_service(pool.get_ref());
    service.delete_account(account_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Configure account routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/accounts")
            .route("/{id}", web::get().to(get_account))
            .route("/{id}", web::put().to(update_account))
            .route("/{id}", web::delete().to(delete_account)),
    );
}
