//! Customer handlers
//!
//! HTTP handlers for customer management endpoints, including the nested
//! account resources owned by a customer.

use crate::dto::customer::{
    CustomerCreateRequest, CustomerFilterParams, CustomerResponse, CustomerUpdateRequest,
};
use crate::dto::{ApiResponse, PaginationParams};
use crate::handlers::account;
use actix_web::{web, HttpResponse};
use gestao_core::traits::Pagination;
use gestao_core::AppError;
use gestao_db::PgCustomerRepository;
use gestao_services::CustomerService;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use validator::Validate;

/// Build the customer service backed by the shared pool
pub(crate) fn customer_service(pool: &PgPool) -> CustomerService<PgCustomerRepository> {
    CustomerService::new(Arc::new(PgCustomerRepository::new(pool.clone())))
}

/// Search customers with pagination and equality filters
///
/// GET /api/v1/customers
#[instrument(skip(pool))]
pub async fn search_customers(
    pool: web::Data<PgPool>,
    query: web::Query<PaginationParams>,
    filters: web::Query<CustomerFilterParams>,
) -> Result<HttpResponse, AppError> {
    query.validate().map_err(|e| {
        warn!("Pagination validation failed: {}", e);
        AppError::Invalid(e.to_string())
    })?;

    debug!(
        page = query.page,
        per_page = query.per_page,
        "Searching customers"
    );

    let service = customer_service(pool.get_ref());
    let page = Pagination::new(query.page, query.per_page);
    let (customers, total) = service.search(&filters.to_filter(), &page).await?;

    let response_data: Vec<CustomerResponse> = customers.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(query.paginate(response_data, total)))
}

/// Create a new customer
///
/// POST /api/v1/customers
#[instrument(skip(pool, req))]
pub async fn create_customer(
    pool: web::Data<PgPool>,
    req: web::Json<CustomerCreateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Customer creation validation failed: {}", e);
        AppError::Invalid(e.to_string())
    })?;

    debug!("Creating customer");

    let service = customer_service(pool.get_ref());
    let created = service.create_customer(req.to_customer()).await?;

    let response = CustomerResponse::from(created);
    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        response,
        "Customer created successfully",
    )))
}

/// Get a single customer by ID
///
/// GET /api/v1/customers/{id}
#[instrument(skip(pool))]
pub async fn get_customer(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();
    debug!(id = customer_id, "Getting customer");

    let service = customer_service(pool.get_ref());
    let customer = service.find_by_id(customer_id).await?;

    let response = CustomerResponse::from(customer);
    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Apply a partial update to a customer
///
/// PUT /api/v1/customers/{id}
#[instrument(skip(pool, req))]
pub async fn update_customer(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    req: web::Json<CustomerUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();
    debug!(id = customer_id, "Updating customer");

    let service = customer_service(pool.get_ref());
    let updated = service
        .update_customer(customer_id, req.to_changes())
        .await?;

    let response = CustomerResponse::from(updated);
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        response,
        "Customer updated successfully",
    )))
}

/// Disable a customer (soft delete)
///
/// PATCH /api/v1/customers/{id}
#[instrument(skip(pool))]
pub async fn disable_customer(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();
    debug!(id = customer_id, "Disabling customer");

    let service = customer_service(pool.get_ref());
    service.disable_customer(customer_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Delete a customer
///
/// DELETE /api/v1/customers/{id}
#[instrument(skip(pool))]
pub async fn delete_customer(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();
    debug!(id = customer_id, "Deleting customer");

    let service = customer_service(pool.get_ref());
    service.delete_customer(customer_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Configure customer routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/customers")
            .route("", web::get().to(search_customers))
            .route("", web::post().to(create_customer))
            .route("/{id}", web::get().to(get_customer))
            .route("/{id}", web::put().to(update_customer))
            .route("/{id}", web::patch().to(disable_customer))
            .route("/{id}", web::delete().to(delete_customer))
            .route("/{id}/accounts", web::post().to(account::create_account))
            .route(
                "/{id}/accounts",
                web::get().to(account::list_customer_accounts),
            ),
    );
}
