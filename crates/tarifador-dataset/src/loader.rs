//! Dataset loader
//!
//! Reads a JSON dataset and materializes the replay context: customers with
//! their lines and contracts, and the event stream sorted by timestamp so
//! the engine's ordering precondition holds.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tracing::{debug, info};

use tarifador_core::models::{Contract, Customer, Event, PhoneLine, RatePlans};
use tarifador_core::{BillingError, BillingResult};

use crate::records::{ContractRecord, DatasetRecord, EventRecord};

/// Timestamp layout used by the dataset
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A fully materialized dataset, ready to replay
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub customers: Vec<Customer>,

    /// Events sorted by timestamp (stable, so ties keep file order)
    pub events: Vec<Event>,
}

/// Builds the replay context from persisted datasets
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    plans: RatePlans,
}

impl DatasetLoader {
    /// Create a loader that instantiates contracts from `plans`
    pub fn new(plans: RatePlans) -> Self {
        Self { plans }
    }

    /// Load a dataset from a JSON file
    pub fn load_path(&self, path: impl AsRef<Path>) -> BillingResult<LoadedDataset> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading dataset");
        let file = File::open(path).map_err(|e| {
            BillingError::Dataset(format!("cannot open {}: {}", path.display(), e))
        })?;
        self.load_reader(BufReader::new(file))
    }

    /// Load a dataset from any reader producing JSON
    pub fn load_reader(&self, reader: impl Read) -> BillingResult<LoadedDataset> {
        let record: DatasetRecord = serde_json::from_reader(reader)?;
        self.build(record)
    }

    /// Load a dataset from a JSON string
    pub fn load_str(&self, json: &str) -> BillingResult<LoadedDataset> {
        let record: DatasetRecord = serde_json::from_str(json)?;
        self.build(record)
    }

    fn build(&self, record: DatasetRecord) -> BillingResult<LoadedDataset> {
        let mut customers = Vec::with_capacity(record.customers.len());
        for customer_record in record.customers {
            let name = customer_record
                .name
                .unwrap_or_else(|| format!("customer {}", customer_record.id));
            let mut customer = Customer::new(customer_record.id, name);
            for line_record in customer_record.lines {
                let contract = self.build_contract(&line_record.contract)?;
                customer.add_line(PhoneLine::new(line_record.number, contract));
            }
            customers.push(customer);
        }

        let mut events = Vec::with_capacity(record.events.len());
        for event_record in &record.events {
            events.push(build_event(event_record)?);
        }
        // Stable: events sharing a timestamp keep their file order.
        events.sort_by_key(|e| e.time);

        info!(
            customers = customers.len(),
            events = events.len(),
            "dataset materialized"
        );
        Ok(LoadedDataset { customers, events })
    }

    fn build_contract(&self, record: &ContractRecord) -> BillingResult<Contract> {
        Ok(match record {
            ContractRecord::Term { start, end } => {
                Contract::term(self.plans.term.clone(), *start, *end)
            }
            ContractRecord::Mtm { start } => {
                Contract::month_to_month(self.plans.mtm.clone(), *start)
            }
            ContractRecord::Prepaid { start, balance } => {
                let balance = Decimal::try_from(*balance).map_err(|e| {
                    BillingError::Dataset(format!("invalid prepaid balance {}: {}", balance, e))
                })?;
                Contract::prepaid(self.plans.prepaid.clone(), *start, balance)
            }
        })
    }
}

fn build_event(record: &EventRecord) -> BillingResult<Event> {
    let time = NaiveDateTime::parse_from_str(&record.time, TIME_FORMAT)
        .map_err(|e| BillingError::Dataset(format!("invalid timestamp {:?}: {}", record.time, e)))?
        .and_utc();
    Ok(Event {
        src_number: record.src_number.clone(),
        dst_number: record.dst_number.clone(),
        time,
        kind: record.kind,
        duration_secs: record.duration,
    })
}
