//! Bill model
//!
//! A bill accumulates one line's charges for one billing month. It has no
//! pricing logic of its own; contracts decide the amounts and record them
//! here. Once finalized, a bill rejects every further mutation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BillingError;
use crate::BillingResult;

use super::period::BillingPeriod;

/// A labelled one-time charge, e.g. an early termination fee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneTimeCharge {
    pub label: String,
    pub amount: Decimal,
}

/// Charges for one line for one billing month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    period: BillingPeriod,
    fixed_fees: Decimal,
    free_minutes_used: u32,
    overage_minutes: u32,
    overage_charge: Decimal,
    messages_billed: u32,
    message_charge: Decimal,
    one_time_charges: Vec<OneTimeCharge>,
    finalized: bool,
}

impl Bill {
    /// Open an empty bill for the given period
    pub(crate) fn open(period: BillingPeriod) -> Self {
        Self {
            period,
            fixed_fees: Decimal::ZERO,
            free_minutes_used: 0,
            overage_minutes: 0,
            overage_charge: Decimal::ZERO,
            messages_billed: 0,
            message_charge: Decimal::ZERO,
            one_time_charges: Vec::new(),
            finalized: false,
        }
    }

    fn check_open(&self) -> BillingResult<()> {
        if self.finalized {
            Err(BillingError::FinalizedBill(self.period))
        } else {
            Ok(())
        }
    }

    /// Record a fixed fee, e.g. the contract's monthly fee
    pub fn add_fixed_fee(&mut self, amount: Decimal) -> BillingResult<()> {
        self.check_open()?;
        self.fixed_fees += amount;
        Ok(())
    }

    /// Record minutes covered by a free allowance
    pub fn add_free_minutes(&mut self, minutes: u32) -> BillingResult<()> {
        self.check_open()?;
        self.free_minutes_used += minutes;
        Ok(())
    }

    /// Record minutes billed at a per-minute rate, with their charge
    pub fn add_billed_minutes(&mut self, minutes: u32, charge: Decimal) -> BillingResult<()> {
        self.check_open()?;
        self.overage_minutes += minutes;
        self.overage_charge += charge;
        Ok(())
    }

    /// Record one billed message, with its charge
    pub fn add_message(&mut self, charge: Decimal) -> BillingResult<()> {
        self.check_open()?;
        self.messages_billed += 1;
        self.message_charge += charge;
        Ok(())
    }

    /// Record a labelled one-time charge
    pub fn add_one_time(&mut self, label: impl Into<String>, amount: Decimal) -> BillingResult<()> {
        self.check_open()?;
        self.one_time_charges.push(OneTimeCharge {
            label: label.into(),
            amount,
        });
        Ok(())
    }

    /// Seal the bill; every later mutation fails
    pub(crate) fn finalize(&mut self) {
        self.finalized = true;
    }

    pub fn period(&self) -> BillingPeriod {
        self.period
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn fixed_fees(&self) -> Decimal {
        self.fixed_fees
    }

    pub fn free_minutes_used(&self) -> u32 {
        self.free_minutes_used
    }

    pub fn overage_minutes(&self) -> u32 {
        self.overage_minutes
    }

    pub fn overage_charge(&self) -> Decimal {
        self.overage_charge
    }

    pub fn messages_billed(&self) -> u32 {
        self.messages_billed
    }

    pub fn message_charge(&self) -> Decimal {
        self.message_charge
    }

    pub fn one_time_charges(&self) -> &[OneTimeCharge] {
        &self.one_time_charges
    }

    /// Total charge on this bill
    pub fn total(&self) -> Decimal {
        let one_time: Decimal = self.one_time_charges.iter().map(|c| c.amount).sum();
        self.fixed_fees + self.overage_charge + self.message_charge + one_time
    }
}
