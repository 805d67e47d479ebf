//! Business logic services for ApiGestao
//!
//! This crate contains the service layer that enforces the admissibility
//! rules for customer and account operations:
//!
//! - Field format validation (cpf checksum, email, phone, reference)
//! - Conditional uniqueness checks (cpf/email, self-comparison excluded)
//! - Soft-delete state transitions (disabled customers, cancelled accounts)
//!
//! # Architecture
//!
//! Services are designed to be composable and testable:
//! - Each service is generic over the repository traits it needs
//! - Services are wrapped in Arc for safe sharing across async tasks
//! - All operations are instrumented with tracing
//! - Failures are raised fail-fast as `AppError` at the point of detection

pub mod account;
pub mod customer;
pub mod validation;

pub use account::AccountService;
pub use customer::CustomerService;

#[cfg(test)]
pub(crate) mod testing;
