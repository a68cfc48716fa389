//! Rate plan models
//!
//! Plans carry the pricing parameters a contract variant is instantiated
//! with. Defaults match the carrier's published tariff; deployments override
//! them through [`BillingConfig`](crate::config::BillingConfig).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::BillingConfig;
use crate::error::BillingError;
use crate::BillingResult;

/// Pricing for term contracts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermPlan {
    /// Fixed fee charged each billing month
    pub monthly_fee: Decimal,

    /// Free minutes included per month
    pub included_minutes: u32,

    /// Rate per minute beyond the included allowance
    pub overage_rate_per_minute: Decimal,

    /// Rate per message; 0 means messages are included
    pub message_rate: Decimal,

    /// One-time penalty for cancelling before the committed end date
    pub termination_fee: Decimal,
}

impl Default for TermPlan {
    fn default() -> Self {
        Self {
            monthly_fee: Decimal::new(2000, 2),
            included_minutes: 100,
            overage_rate_per_minute: Decimal::new(10, 2),
            message_rate: Decimal::ZERO,
            termination_fee: Decimal::new(28000, 2),
        }
    }
}

/// Pricing for month-to-month contracts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MtmPlan {
    /// Fixed fee charged each billing month
    pub monthly_fee: Decimal,

    /// Rate per minute; there is no included allowance
    pub rate_per_minute: Decimal,

    /// Rate per message
    pub message_rate: Decimal,
}

impl Default for MtmPlan {
    fn default() -> Self {
        Self {
            monthly_fee: Decimal::new(5000, 2),
            rate_per_minute: Decimal::new(5, 2),
            message_rate: Decimal::new(5, 2),
        }
    }
}

/// Pricing for prepaid contracts
///
/// Prepaid lines pay no monthly fee; usage is debited from a balance the
/// customer tops up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepaidPlan {
    /// Rate per minute debited from the balance
    pub rate_per_minute: Decimal,

    /// Rate per message debited from the balance
    pub rate_per_message: Decimal,
}

impl Default for PrepaidPlan {
    fn default() -> Self {
        Self {
            rate_per_minute: Decimal::new(25, 3),
            rate_per_message: Decimal::new(25, 3),
        }
    }
}

/// The rate plans for all contract variants
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatePlans {
    pub term: TermPlan,
    pub mtm: MtmPlan,
    pub prepaid: PrepaidPlan,
}

impl RatePlans {
    /// Build rate plans from the billing configuration
    ///
    /// # Errors
    ///
    /// Returns `BillingError::Config` if a configured rate cannot be
    /// represented as a decimal amount.
    pub fn from_config(config: &BillingConfig) -> BillingResult<Self> {
        Ok(Self {
            term: TermPlan {
                monthly_fee: to_decimal("term_monthly_fee", config.term_monthly_fee)?,
                included_minutes: config.term_included_minutes,
                overage_rate_per_minute: to_decimal(
                    "term_overage_rate_per_minute",
                    config.term_overage_rate_per_minute,
                )?,
                message_rate: to_decimal("term_message_rate", config.term_message_rate)?,
                termination_fee: to_decimal("term_termination_fee", config.term_termination_fee)?,
            },
            mtm: MtmPlan {
                monthly_fee: to_decimal("mtm_monthly_fee", config.mtm_monthly_fee)?,
                rate_per_minute: to_decimal("mtm_rate_per_minute", config.mtm_rate_per_minute)?,
                message_rate: to_decimal("mtm_message_rate", config.mtm_message_rate)?,
            },
            prepaid: PrepaidPlan {
                rate_per_minute: to_decimal(
                    "prepaid_rate_per_minute",
                    config.prepaid_rate_per_minute,
                )?,
                rate_per_message: to_decimal(
                    "prepaid_rate_per_message",
                    config.prepaid_rate_per_message,
                )?,
            },
        })
    }
}

fn to_decimal(field: &str, value: f64) -> BillingResult<Decimal> {
    Decimal::try_from(value)
        .map_err(|e| BillingError::Config(format!("invalid amount for {}: {}", field, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_plans_match_tariff() {
        let plans = RatePlans::default();
        assert_eq!(plans.term.monthly_fee, dec!(20.00));
        assert_eq!(plans.term.included_minutes, 100);
        assert_eq!(plans.term.overage_rate_per_minute, dec!(0.10));
        assert_eq!(plans.mtm.monthly_fee, dec!(50.00));
        assert_eq!(plans.mtm.rate_per_minute, dec!(0.05));
        assert_eq!(plans.prepaid.rate_per_minute, dec!(0.025));
    }

    #[test]
    fn test_from_config_defaults_round_trip() {
        let config = BillingConfig::default();
        let plans = RatePlans::from_config(&config).unwrap();
        assert_eq!(plans, RatePlans::default());
    }

    #[test]
    fn test_from_config_rejects_non_finite() {
        let config = BillingConfig {
            mtm_rate_per_minute: f64::NAN,
            ..Default::default()
        };
        assert!(RatePlans::from_config(&config).is_err());
    }
}
