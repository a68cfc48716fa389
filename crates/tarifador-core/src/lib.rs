//! Tarifador Core Library
//!
//! This crate provides the foundational types and error handling for the
//! Tarifador billing system. It includes:
//!
//! - Domain models (Event, Contract, Bill, PhoneLine, Customer, etc.)
//! - Rate plans with configurable defaults
//! - Unified error handling
//! - Application configuration

pub mod config;
pub mod error;
pub mod models;

pub use config::AppConfig;
pub use error::BillingError;

/// Result type alias using BillingError
pub type BillingResult<T> = Result<T, BillingError>;
