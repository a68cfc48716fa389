//! Phone line model
//!
//! A phone line binds a number to exactly one contract, the bills that
//! contract has finalized, and the line's event history. The replay engine
//! drives the billing cycle through the helpers here so every finalized bill
//! is retained by its line.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::BillingError;
use crate::BillingResult;

use super::bill::Bill;
use super::contract::{CallCharge, Contract, MessageCharge};
use super::event::Event;
use super::history::CallHistory;
use super::period::BillingPeriod;

/// One phone line and its billing state
#[derive(Debug, Clone)]
pub struct PhoneLine {
    number: String,
    contract: Contract,
    bills: Vec<Bill>,
    history: CallHistory,
}

impl PhoneLine {
    pub fn new(number: impl Into<String>, contract: Contract) -> Self {
        Self {
            number: number.into(),
            contract,
            bills: Vec::new(),
            history: CallHistory::new(),
        }
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn contract_mut(&mut self) -> &mut Contract {
        &mut self.contract
    }

    /// Finalized bills, oldest first
    pub fn bills(&self) -> &[Bill] {
        &self.bills
    }

    pub fn history(&self) -> &CallHistory {
        &self.history
    }

    /// The currently open billing period, if any
    pub fn open_period(&self) -> Option<BillingPeriod> {
        self.contract.open_period()
    }

    /// The finalized bill for one period, if the line has one
    pub fn bill_for(&self, period: BillingPeriod) -> Option<&Bill> {
        self.bills.iter().find(|b| b.period() == period)
    }

    /// Make sure `period` is the open billing month
    ///
    /// Closes a differing open month first (retaining its bill) and opens
    /// the requested one. Returns the bill that was closed, if any.
    pub fn start_cycle(&mut self, period: BillingPeriod) -> BillingResult<Option<Bill>> {
        match self.contract.open_period() {
            Some(open) if open == period => Ok(None),
            Some(_) => {
                let bill = self.contract.close_month()?;
                self.bills.push(bill.clone());
                self.contract.open_month(period)?;
                Ok(Some(bill))
            }
            None => {
                self.contract.open_month(period)?;
                Ok(None)
            }
        }
    }

    /// Close the open billing month, if any, retaining its bill
    pub fn close_cycle(&mut self) -> BillingResult<Option<Bill>> {
        if self.contract.open_period().is_none() {
            return Ok(None);
        }
        let bill = self.contract.close_month()?;
        self.bills.push(bill.clone());
        Ok(Some(bill))
    }

    /// Bill an outgoing call and record it in the history
    pub fn record_outgoing_call(&mut self, event: &Event) -> BillingResult<CallCharge> {
        let charge = self.contract.record_call(event.billable_minutes())?;
        self.history.register_outgoing(event.clone());
        Ok(charge)
    }

    /// Bill an outgoing message and record it in the history
    pub fn record_outgoing_message(&mut self, event: &Event) -> BillingResult<MessageCharge> {
        let charge = self.contract.record_message()?;
        self.history.register_outgoing(event.clone());
        Ok(charge)
    }

    /// Record a received event; receiving is free
    pub fn record_incoming(&mut self, event: &Event) {
        self.history.register_incoming(event.clone());
    }

    /// Cancel the line's contract effective `on`; returns the one-time
    /// charge
    pub fn cancel(&mut self, on: NaiveDate) -> BillingResult<Decimal> {
        self.contract.cancel(on)
    }

    /// Swap in a different contract, returning the old one
    ///
    /// Contracts can only change between billing months.
    ///
    /// # Errors
    ///
    /// `InvalidState` while a billing month is open.
    pub fn replace_contract(&mut self, contract: Contract) -> BillingResult<Contract> {
        if let Some(period) = self.contract.open_period() {
            return Err(BillingError::InvalidState(format!(
                "cannot replace the contract on {} while {} is open",
                self.number, period
            )));
        }
        Ok(std::mem::replace(&mut self.contract, contract))
    }
}
