//! Application configuration
//!
//! Centralized configuration management using the `config` crate.
//! Configuration is layered: built-in defaults, then an optional config
//! file, then `TARIFADOR`-prefixed environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub dataset: DatasetConfig,
    pub billing: BillingConfig,
}

/// Input dataset configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DatasetConfig {
    /// Path to the JSON dataset file
    #[serde(default = "default_dataset_path")]
    pub path: String,
}

fn default_dataset_path() -> String {
    "data/sample.json".to_string()
}

/// Billing tariff configuration
///
/// Default rate-plan parameters applied to contracts when the dataset does
/// not carry its own. Amounts are currency units, rates are per minute or
/// per message.
#[derive(Debug, Deserialize, Clone)]
pub struct BillingConfig {
    /// Monthly fee for term contracts
    #[serde(default = "default_term_monthly_fee")]
    pub term_monthly_fee: f64,

    /// Free minutes included per month in term contracts
    #[serde(default = "default_term_included_minutes")]
    pub term_included_minutes: u32,

    /// Per-minute rate beyond the term allowance
    #[serde(default = "default_term_overage_rate")]
    pub term_overage_rate_per_minute: f64,

    /// Per-message rate for term contracts (0 = included)
    #[serde(default)]
    pub term_message_rate: f64,

    /// One-time fee for cancelling a term contract early
    #[serde(default = "default_term_termination_fee")]
    pub term_termination_fee: f64,

    /// Monthly fee for month-to-month contracts
    #[serde(default = "default_mtm_monthly_fee")]
    pub mtm_monthly_fee: f64,

    /// Per-minute rate for month-to-month contracts
    #[serde(default = "default_mtm_rate")]
    pub mtm_rate_per_minute: f64,

    /// Per-message rate for month-to-month contracts
    #[serde(default = "default_mtm_rate")]
    pub mtm_message_rate: f64,

    /// Per-minute rate debited from prepaid balances
    #[serde(default = "default_prepaid_rate")]
    pub prepaid_rate_per_minute: f64,

    /// Per-message rate debited from prepaid balances
    #[serde(default = "default_prepaid_rate")]
    pub prepaid_rate_per_message: f64,
}

fn default_term_monthly_fee() -> f64 {
    20.00
}

fn default_term_included_minutes() -> u32 {
    100
}

fn default_term_overage_rate() -> f64 {
    0.10
}

fn default_term_termination_fee() -> f64 {
    280.00
}

fn default_mtm_monthly_fee() -> f64 {
    50.00
}

fn default_mtm_rate() -> f64 {
    0.05
}

fn default_prepaid_rate() -> f64 {
    0.025
}

impl AppConfig {
    /// Load configuration from environment and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with default values
            .set_default("dataset.path", default_dataset_path())?
            .set_default("billing.term_monthly_fee", 20.00)?
            .set_default("billing.term_included_minutes", 100)?
            .set_default("billing.term_overage_rate_per_minute", 0.10)?
            .set_default("billing.term_message_rate", 0.00)?
            .set_default("billing.term_termination_fee", 280.00)?
            .set_default("billing.mtm_monthly_fee", 50.00)?
            .set_default("billing.mtm_rate_per_minute", 0.05)?
            .set_default("billing.mtm_message_rate", 0.05)?
            .set_default("billing.prepaid_rate_per_minute", 0.025)?
            .set_default("billing.prepaid_rate_per_message", 0.025)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables with TARIFADOR_ prefix
            .add_source(
                Environment::with_prefix("TARIFADOR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("TARIFADOR").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            term_monthly_fee: 20.00,
            term_included_minutes: 100,
            term_overage_rate_per_minute: 0.10,
            term_message_rate: 0.00,
            term_termination_fee: 280.00,
            mtm_monthly_fee: 50.00,
            mtm_rate_per_minute: 0.05,
            mtm_message_rate: 0.05,
            prepaid_rate_per_minute: 0.025,
            prepaid_rate_per_message: 0.025,
        }
    }
}
