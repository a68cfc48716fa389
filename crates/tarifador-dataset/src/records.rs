//! Raw dataset records
//!
//! Serde mirror of the persisted dataset: customer definitions with their
//! lines and contracts, and a chronological list of event records. Shapes
//! match the file format; the loader turns them into domain values.

use chrono::NaiveDate;
use serde::Deserialize;

use tarifador_core::models::EventKind;

/// Top-level dataset document
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetRecord {
    pub customers: Vec<CustomerRecord>,
    pub events: Vec<EventRecord>,
}

/// One customer definition
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerRecord {
    pub id: u32,

    /// Display name; older datasets omit it
    #[serde(default)]
    pub name: Option<String>,

    pub lines: Vec<LineRecord>,
}

/// One line definition
#[derive(Debug, Clone, Deserialize)]
pub struct LineRecord {
    pub number: String,
    pub contract: ContractRecord,
}

/// Contract selection for a line
///
/// Pricing comes from the configured rate plans; the dataset only carries
/// the per-line parameters (dates, prepaid balance).
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContractRecord {
    Term { start: NaiveDate, end: NaiveDate },
    Mtm { start: NaiveDate },
    Prepaid { start: NaiveDate, balance: f64 },
}

/// One event record
///
/// `time` is the switch's local timestamp, `YYYY-MM-DD HH:MM:SS`.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "type")]
    pub kind: EventKind,

    pub src_number: String,
    pub dst_number: String,
    pub time: String,

    /// Call duration in seconds; absent for messages
    #[serde(default)]
    pub duration: u32,
}
