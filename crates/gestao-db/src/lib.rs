//! ApiGestao Database Layer
//!
//! This crate provides PostgreSQL database access and repository implementations
//! for the ApiGestao system. It includes:
//!
//! - Connection pool management with sqlx
//! - Repository implementations for customers and accounts
//! - Parameter-bound dynamic filtering for customer searches

pub mod pool;
pub mod repositories;

pub use pool::create_pool;
pub use repositories::*;

// Re-export commonly used types
pub use gestao_core::{AppError, AppResult};
pub use sqlx::{PgPool, Postgres, Transaction};
