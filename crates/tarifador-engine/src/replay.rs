//! Billing replay engine
//!
//! Folds a presorted event stream over the contracts in a replay context.
//! Month rollover is explicit: the first event of a new month for a line
//! closes the previous bill and opens the next one before the event is
//! applied, and every still-open month is closed at end of stream.
//!
//! Failure handling follows the severity of the problem: a timestamp
//! regression aborts the whole replay (partial bill math would not be
//! reproducible), a contract lifecycle error quarantines the affected line,
//! and an event from an unknown line is dropped with a warning.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use tarifador_core::models::{Customer, Event, EventKind};
use tarifador_core::{BillingError, BillingResult};

use crate::report::BillingReport;

/// Replays event streams into monthly bills
///
/// By default a prepaid line that overdraws its balance keeps accruing debt
/// and each overdraft is surfaced as a warning. With
/// [`halt_overdrawn_lines`](Self::halt_overdrawn_lines) the engine instead
/// stops billing such a line until it is topped up.
#[derive(Debug, Clone, Default)]
pub struct BillingEngine {
    halt_overdrawn_lines: bool,
}

impl BillingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop billing prepaid lines whose balance has gone negative
    pub fn halt_overdrawn_lines(mut self, halt: bool) -> Self {
        self.halt_overdrawn_lines = halt;
        self
    }

    /// Replay `events` against the lines owned by `customers`
    ///
    /// Events must be presorted by timestamp; events sharing a timestamp
    /// are processed in input order.
    ///
    /// # Errors
    ///
    /// `OutOfOrder` if a timestamp regresses, `Dataset` if two customers
    /// claim the same line number. Everything else is handled in place and
    /// reported through the returned [`BillingReport`].
    #[instrument(skip_all, fields(events = events.len(), customers = customers.len()))]
    pub fn replay(
        &self,
        events: &[Event],
        customers: &mut [Customer],
    ) -> BillingResult<BillingReport> {
        let index = build_line_index(customers)?;

        let mut report = BillingReport::new();
        let mut last_time: Option<DateTime<Utc>> = None;
        let mut quarantined: HashSet<String> = HashSet::new();
        let mut halted: HashSet<String> = HashSet::new();

        for event in events {
            if let Some(last) = last_time {
                if event.time < last {
                    return Err(BillingError::OutOfOrder {
                        last,
                        current: event.time,
                    });
                }
            }
            last_time = Some(event.time);

            // The receiving side only records history; receiving is free.
            match index.get(event.dst_number.as_str()) {
                Some(&(ci, li)) => customers[ci].lines_mut()[li].record_incoming(event),
                None => {
                    warn!(number = %event.dst_number, "event received by unknown line");
                    report.stats_mut().note_unknown(&event.dst_number);
                }
            }

            let Some(&(ci, li)) = index.get(event.src_number.as_str()) else {
                warn!(number = %event.src_number, "dropping event from unknown line");
                report.stats_mut().note_unknown(&event.src_number);
                report.stats_mut().events_dropped += 1;
                continue;
            };

            if quarantined.contains(event.src_number.as_str()) {
                report.stats_mut().events_dropped += 1;
                continue;
            }
            if self.halt_overdrawn_lines && halted.contains(event.src_number.as_str()) {
                debug!(number = %event.src_number, "billing halted, balance not topped up");
                report.stats_mut().events_dropped += 1;
                continue;
            }

            let line = &mut customers[ci].lines_mut()[li];
            let period = event.billing_period();

            // Month rollover happens before the triggering event is applied.
            match line.start_cycle(period) {
                Ok(Some(closed)) => {
                    debug!(number = %event.src_number, period = %closed.period(), total = %closed.total(), "billing month closed");
                    report.insert(event.src_number.clone(), closed);
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(number = %event.src_number, error = %err, "line quarantined after lifecycle error");
                    quarantined.insert(event.src_number.clone());
                    report
                        .stats_mut()
                        .quarantined_lines
                        .push(event.src_number.clone());
                    report.stats_mut().events_dropped += 1;
                    continue;
                }
            }

            let outcome = match event.kind {
                EventKind::Call => line.record_outgoing_call(event).map(|c| c.overdrawn),
                EventKind::Message => line.record_outgoing_message(event).map(|c| c.overdrawn),
            };

            match outcome {
                Ok(overdrawn) => {
                    report.stats_mut().events_processed += 1;
                    if overdrawn {
                        report.stats_mut().overdraft_events += 1;
                        let balance = line.contract().balance().unwrap_or_default();
                        warn!(number = %event.src_number, %balance, "prepaid balance overdrawn");
                        if self.halt_overdrawn_lines {
                            halted.insert(event.src_number.clone());
                        }
                    }
                }
                Err(err) => {
                    warn!(number = %event.src_number, error = %err, "line quarantined after lifecycle error");
                    quarantined.insert(event.src_number.clone());
                    report
                        .stats_mut()
                        .quarantined_lines
                        .push(event.src_number.clone());
                    report.stats_mut().events_dropped += 1;
                }
            }
        }

        // End of stream: close every month still open. Quarantined lines are
        // left as they are; their state is not trustworthy.
        for customer in customers.iter_mut() {
            for line in customer.lines_mut() {
                if quarantined.contains(line.number()) {
                    continue;
                }
                if let Some(bill) = line.close_cycle()? {
                    report.insert(line.number().to_string(), bill);
                }
            }
        }

        let stats = report.stats();
        info!(
            bills = report.len(),
            processed = stats.events_processed,
            dropped = stats.events_dropped,
            "replay complete"
        );
        Ok(report)
    }
}

/// Map every line number to its position in the customer slice
fn build_line_index(customers: &[Customer]) -> BillingResult<HashMap<String, (usize, usize)>> {
    let mut index = HashMap::new();
    for (ci, customer) in customers.iter().enumerate() {
        for (li, line) in customer.lines().iter().enumerate() {
            if index.insert(line.number().to_string(), (ci, li)).is_some() {
                return Err(BillingError::Dataset(format!(
                    "line number {} appears more than once in the replay context",
                    line.number()
                )));
            }
        }
    }
    Ok(index)
}
