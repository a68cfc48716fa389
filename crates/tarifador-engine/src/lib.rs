//! Tarifador Billing Engine
//!
//! Replays a chronological stream of call and message events against the
//! contracts of a set of customers, producing one finalized [`Bill`] per
//! line per month in a [`BillingReport`].
//!
//! The engine is a synchronous fold over a presorted event sequence: it
//! detects month transitions, drives each contract's billing cycle, and
//! dispatches every event to the originating line's pricing rule.
//!
//! [`Bill`]: tarifador_core::models::Bill

pub mod replay;
pub mod report;

pub use replay::BillingEngine;
pub use report::{BillingReport, ReplayStats};
