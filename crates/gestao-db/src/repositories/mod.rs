//! Repository implementations
//!
//! This module contains concrete implementations of the repository traits
//! defined in gestao-core, using sqlx for PostgreSQL access.

pub mod account_repo;
pub mod customer_repo;

pub use account_repo::PgAccountRepository;
pub use customer_repo::PgCustomerRepository;
