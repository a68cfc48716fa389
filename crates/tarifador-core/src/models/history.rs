//! Per-line event history
//!
//! Keeps the calls and messages a line sent and received, keyed by billing
//! period, in the order they were registered. Append-only.

use std::collections::BTreeMap;

use super::event::Event;
use super::period::BillingPeriod;

/// Incoming and outgoing events for one line
#[derive(Debug, Clone, Default)]
pub struct CallHistory {
    outgoing: BTreeMap<BillingPeriod, Vec<Event>>,
    incoming: BTreeMap<BillingPeriod, Vec<Event>>,
}

impl CallHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event this line originated
    pub fn register_outgoing(&mut self, event: Event) {
        self.outgoing
            .entry(event.billing_period())
            .or_default()
            .push(event);
    }

    /// Register an event this line received
    pub fn register_incoming(&mut self, event: Event) {
        self.incoming
            .entry(event.billing_period())
            .or_default()
            .push(event);
    }

    /// Outgoing and incoming events for one period, in that order
    pub fn monthly_history(&self, period: BillingPeriod) -> (&[Event], &[Event]) {
        (
            self.outgoing.get(&period).map(Vec::as_slice).unwrap_or(&[]),
            self.incoming.get(&period).map(Vec::as_slice).unwrap_or(&[]),
        )
    }

    /// All outgoing events across all periods, chronological by period
    pub fn all_outgoing(&self) -> impl Iterator<Item = &Event> {
        self.outgoing.values().flatten()
    }

    /// All incoming events across all periods, chronological by period
    pub fn all_incoming(&self) -> impl Iterator<Item = &Event> {
        self.incoming.values().flatten()
    }

    /// Periods with at least one registered event
    pub fn periods(&self) -> impl Iterator<Item = BillingPeriod> + '_ {
        let mut periods: Vec<BillingPeriod> = self
            .outgoing
            .keys()
            .chain(self.incoming.keys())
            .copied()
            .collect();
        periods.sort_unstable();
        periods.dedup();
        periods.into_iter()
    }

    pub fn is_empty(&self) -> bool {
        self.outgoing.is_empty() && self.incoming.is_empty()
    }
}
