//! Tarifador
//!
//! Replays a dataset of call and message records against each customer's
//! contract and logs the resulting monthly bills. The billing rules live in
//! tarifador-core, the replay loop in tarifador-engine; this binary is only
//! startup glue.

use std::env;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tarifador_core::models::RatePlans;
use tarifador_core::AppConfig;
use tarifador_dataset::{DatasetLoader, LoadedDataset};
use tarifador_engine::BillingEngine;

/// Initialize tracing/logging
fn init_tracing() {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "tarifador={},tarifador_core={},tarifador_dataset={},tarifador_engine={}",
            log_level, log_level, log_level, log_level
        ))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();
}

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    info!("Starting Tarifador v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load().context("failed to load configuration")?;
    let plans = RatePlans::from_config(&config.billing)?;

    let loader = DatasetLoader::new(plans);
    let LoadedDataset {
        mut customers,
        events,
    } = loader
        .load_path(&config.dataset.path)
        .with_context(|| format!("failed to load dataset from {}", config.dataset.path))?;

    let engine = BillingEngine::new();
    let report = engine.replay(&events, &mut customers)?;

    for period in report.periods() {
        for customer in &customers {
            let total = report.customer_total(customer, period);
            info!(
                period = %period,
                customer = customer.name(),
                id = customer.id(),
                total = %total,
                "monthly total"
            );
        }
    }

    let stats = report.stats();
    if !stats.is_clean() {
        warn!(
            dropped = stats.events_dropped,
            unknown = stats.unknown_numbers.len(),
            overdrafts = stats.overdraft_events,
            quarantined = stats.quarantined_lines.len(),
            "replay finished with warnings"
        );
    }

    info!(bills = report.len(), "done");
    Ok(())
}
