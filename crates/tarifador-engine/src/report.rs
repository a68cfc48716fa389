//! Replay output
//!
//! The report maps every `(line number, billing period)` pair to its
//! finalized bill and carries the statistics and warnings accumulated while
//! replaying. Iteration order is deterministic.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::Serialize;

use tarifador_core::models::{Bill, BillingPeriod, Customer};

/// Counters and warnings from one replay
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplayStats {
    /// Events billed to a line
    pub events_processed: u64,

    /// Events dropped (unknown source, quarantined or halted line)
    pub events_dropped: u64,

    /// Line numbers referenced by events but absent from the context
    pub unknown_numbers: BTreeSet<String>,

    /// Events that left a prepaid balance negative
    pub overdraft_events: u64,

    /// Lines abandoned after a contract lifecycle error
    pub quarantined_lines: Vec<String>,
}

impl ReplayStats {
    pub(crate) fn note_unknown(&mut self, number: &str) {
        self.unknown_numbers.insert(number.to_string());
    }

    /// Whether the replay finished without data-quality warnings
    pub fn is_clean(&self) -> bool {
        self.events_dropped == 0
            && self.unknown_numbers.is_empty()
            && self.overdraft_events == 0
            && self.quarantined_lines.is_empty()
    }
}

/// Finalized bills produced by one replay
#[derive(Debug, Clone, Default)]
pub struct BillingReport {
    bills: BTreeMap<(String, BillingPeriod), Bill>,
    stats: ReplayStats,
}

impl BillingReport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, number: String, bill: Bill) {
        self.bills.insert((number, bill.period()), bill);
    }

    pub(crate) fn stats_mut(&mut self) -> &mut ReplayStats {
        &mut self.stats
    }

    pub fn stats(&self) -> &ReplayStats {
        &self.stats
    }

    /// The finalized bill for one line and month
    pub fn bill(&self, number: &str, period: BillingPeriod) -> Option<&Bill> {
        self.bills.get(&(number.to_string(), period))
    }

    /// All bills, ordered by line number then period
    pub fn iter(&self) -> impl Iterator<Item = (&str, BillingPeriod, &Bill)> {
        self.bills
            .iter()
            .map(|((number, period), bill)| (number.as_str(), *period, bill))
    }

    /// Every period that has at least one bill, ascending
    pub fn periods(&self) -> Vec<BillingPeriod> {
        let mut periods: Vec<BillingPeriod> =
            self.bills.keys().map(|(_, period)| *period).collect();
        periods.sort_unstable();
        periods.dedup();
        periods
    }

    /// Total charged to one line for one month; zero without a bill
    pub fn line_total(&self, number: &str, period: BillingPeriod) -> Decimal {
        self.bill(number, period)
            .map(|b| b.total())
            .unwrap_or(Decimal::ZERO)
    }

    /// Total charged to a customer for one month, summed across their lines
    pub fn customer_total(&self, customer: &Customer, period: BillingPeriod) -> Decimal {
        customer
            .numbers()
            .map(|number| self.line_total(number, period))
            .sum()
    }

    pub fn len(&self) -> usize {
        self.bills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bills.is_empty()
    }
}
