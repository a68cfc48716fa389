//! Tarifador Dataset Library
//!
//! The external-collaborator side of the billing core: serde record types
//! mirroring the persisted JSON dataset, and a loader that materializes
//! `Customer`/`PhoneLine`/`Event` values from it. The billing core never
//! parses the raw file itself.

pub mod loader;
pub mod records;

pub use loader::{DatasetLoader, LoadedDataset};
pub use records::{ContractRecord, CustomerRecord, DatasetRecord, EventRecord, LineRecord};
