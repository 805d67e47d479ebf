//! HTTP request handlers

pub mod account;
pub mod customer;

pub use account::configure as configure_accounts;
pub use customer::configure as configure_customers;
