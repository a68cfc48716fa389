//! Domain models for Tarifador
//!
//! This module contains all the core domain models used throughout the
//! billing system.

pub mod bill;
pub mod contract;
pub mod customer;
pub mod event;
pub mod history;
pub mod line;
pub mod period;
pub mod plan;

pub use bill::{Bill, OneTimeCharge};
pub use contract::{CallCharge, Contract, ContractKind, MessageCharge};
pub use customer::Customer;
pub use event::{Event, EventKind};
pub use history::CallHistory;
pub use line::PhoneLine;
pub use period::BillingPeriod;
pub use plan::{MtmPlan, PrepaidPlan, RatePlans, TermPlan};
