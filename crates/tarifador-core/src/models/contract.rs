//! Contract variants and pricing rules
//!
//! A contract binds a pricing policy to one phone line and owns that line's
//! monthly billing state: the open [`Bill`] and the variant's counters. The
//! engine drives the lifecycle explicitly — `open_month`, then any number of
//! `record_call`/`record_message`, then `close_month` — and contracts never
//! roll months over on their own.
//!
//! Shared state lives in [`Contract`]; variant-specific pricing terms and
//! counters live in [`ContractTerms`]. Each pricing rule is a pure function
//! over the plan and the current counters.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::BillingError;
use crate::BillingResult;

use super::bill::Bill;
use super::period::BillingPeriod;
use super::plan::{MtmPlan, PrepaidPlan, TermPlan};

/// Contract kind discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractKind {
    Term,
    #[serde(rename = "mtm")]
    MonthToMonth,
    Prepaid,
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractKind::Term => write!(f, "term"),
            ContractKind::MonthToMonth => write!(f, "mtm"),
            ContractKind::Prepaid => write!(f, "prepaid"),
        }
    }
}

/// Outcome of rating one call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallCharge {
    /// Billable minutes of the call
    pub minutes: u32,

    /// Minutes covered by a free allowance
    pub free_minutes: u32,

    /// Minutes charged at the per-minute rate
    pub billed_minutes: u32,

    /// Amount charged
    pub amount: Decimal,

    /// A prepaid balance went (or stayed) negative
    pub overdrawn: bool,
}

/// Outcome of rating one message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageCharge {
    /// Amount charged
    pub amount: Decimal,

    /// A prepaid balance went (or stayed) negative
    pub overdrawn: bool,
}

/// Variant-specific pricing terms and monthly counters
#[derive(Debug, Clone)]
pub enum ContractTerms {
    /// Committed until `end`; includes a monthly minute allowance
    Term {
        plan: TermPlan,
        end: NaiveDate,
        free_minutes_remaining: u32,
    },
    /// No commitment, no allowance, flat per-minute rate
    MonthToMonth { plan: MtmPlan },
    /// Usage debited from a customer-owned balance; no monthly fee
    Prepaid { plan: PrepaidPlan, balance: Decimal },
}

/// A contract for a phone line
///
/// Invariant: at most one bill is open at a time, and every charge lands on
/// the bill of the month it occurred in.
#[derive(Debug, Clone)]
pub struct Contract {
    start: NaiveDate,
    terms: ContractTerms,
    bill: Option<Bill>,
    cancelled_on: Option<NaiveDate>,
}

impl Contract {
    /// Create a term contract committed from `start` to `end`
    pub fn term(plan: TermPlan, start: NaiveDate, end: NaiveDate) -> Self {
        let free = plan.included_minutes;
        Self {
            start,
            terms: ContractTerms::Term {
                plan,
                end,
                free_minutes_remaining: free,
            },
            bill: None,
            cancelled_on: None,
        }
    }

    /// Create a month-to-month contract
    pub fn month_to_month(plan: MtmPlan, start: NaiveDate) -> Self {
        Self {
            start,
            terms: ContractTerms::MonthToMonth { plan },
            bill: None,
            cancelled_on: None,
        }
    }

    /// Create a prepaid contract with an initial balance
    pub fn prepaid(plan: PrepaidPlan, start: NaiveDate, initial_balance: Decimal) -> Self {
        Self {
            start,
            terms: ContractTerms::Prepaid {
                plan,
                balance: initial_balance,
            },
            bill: None,
            cancelled_on: None,
        }
    }

    pub fn kind(&self) -> ContractKind {
        match self.terms {
            ContractTerms::Term { .. } => ContractKind::Term,
            ContractTerms::MonthToMonth { .. } => ContractKind::MonthToMonth,
            ContractTerms::Prepaid { .. } => ContractKind::Prepaid,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Committed end date; `None` for non-term contracts
    pub fn end(&self) -> Option<NaiveDate> {
        match &self.terms {
            ContractTerms::Term { end, .. } => Some(*end),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled_on.is_some()
    }

    pub fn cancelled_on(&self) -> Option<NaiveDate> {
        self.cancelled_on
    }

    /// The bill currently being accumulated, if a month is open
    pub fn current_bill(&self) -> Option<&Bill> {
        self.bill.as_ref()
    }

    /// The currently open billing period, if any
    pub fn open_period(&self) -> Option<BillingPeriod> {
        self.bill.as_ref().map(|b| b.period())
    }

    /// Remaining free minutes this month; `None` for non-term contracts
    pub fn free_minutes_remaining(&self) -> Option<u32> {
        match &self.terms {
            ContractTerms::Term {
                free_minutes_remaining,
                ..
            } => Some(*free_minutes_remaining),
            _ => None,
        }
    }

    /// Current balance; `None` for non-prepaid contracts
    pub fn balance(&self) -> Option<Decimal> {
        match &self.terms {
            ContractTerms::Prepaid { balance, .. } => Some(*balance),
            _ => None,
        }
    }

    /// Whether a prepaid balance is currently negative
    pub fn is_overdrawn(&self) -> bool {
        matches!(&self.terms, ContractTerms::Prepaid { balance, .. } if *balance < Decimal::ZERO)
    }

    /// Fixed fee charged each billing month
    pub fn monthly_fee(&self) -> Decimal {
        match &self.terms {
            ContractTerms::Term { plan, .. } => plan.monthly_fee,
            ContractTerms::MonthToMonth { plan } => plan.monthly_fee,
            ContractTerms::Prepaid { .. } => Decimal::ZERO,
        }
    }

    /// Start a new billing month
    ///
    /// Resets the monthly counters and opens a fresh bill for `period`.
    ///
    /// # Errors
    ///
    /// `InvalidState` if a month is already open and unclosed.
    pub fn open_month(&mut self, period: BillingPeriod) -> BillingResult<()> {
        if let Some(open) = &self.bill {
            return Err(BillingError::InvalidState(format!(
                "cannot open {}: month {} is still open",
                period,
                open.period()
            )));
        }
        if let ContractTerms::Term {
            plan,
            free_minutes_remaining,
            ..
        } = &mut self.terms
        {
            *free_minutes_remaining = plan.included_minutes;
        }
        self.bill = Some(Bill::open(period));
        Ok(())
    }

    /// Apply the pricing rule for a call of `duration_minutes` to the open
    /// bill
    ///
    /// # Errors
    ///
    /// `InvalidState` if no billing month is open. A depleted prepaid
    /// balance is not an error; the outcome comes back flagged `overdrawn`.
    pub fn record_call(&mut self, duration_minutes: u32) -> BillingResult<CallCharge> {
        let bill = self.bill.as_mut().ok_or_else(|| {
            BillingError::InvalidState("cannot record a call: no billing month is open".to_string())
        })?;

        let charge = match &mut self.terms {
            ContractTerms::Term {
                plan,
                free_minutes_remaining,
                ..
            } => {
                let (free, billed, amount) =
                    rate_term_call(plan, *free_minutes_remaining, duration_minutes);
                *free_minutes_remaining -= free;
                CallCharge {
                    minutes: duration_minutes,
                    free_minutes: free,
                    billed_minutes: billed,
                    amount,
                    overdrawn: false,
                }
            }
            ContractTerms::MonthToMonth { plan } => CallCharge {
                minutes: duration_minutes,
                free_minutes: 0,
                billed_minutes: duration_minutes,
                amount: Decimal::from(duration_minutes) * plan.rate_per_minute,
                overdrawn: false,
            },
            ContractTerms::Prepaid { plan, balance } => {
                let amount = Decimal::from(duration_minutes) * plan.rate_per_minute;
                *balance -= amount;
                CallCharge {
                    minutes: duration_minutes,
                    free_minutes: 0,
                    billed_minutes: duration_minutes,
                    amount,
                    overdrawn: *balance < Decimal::ZERO,
                }
            }
        };

        bill.add_free_minutes(charge.free_minutes)?;
        bill.add_billed_minutes(charge.billed_minutes, charge.amount)?;
        Ok(charge)
    }

    /// Apply the pricing rule for one message to the open bill
    ///
    /// # Errors
    ///
    /// `InvalidState` if no billing month is open.
    pub fn record_message(&mut self) -> BillingResult<MessageCharge> {
        let bill = self.bill.as_mut().ok_or_else(|| {
            BillingError::InvalidState(
                "cannot record a message: no billing month is open".to_string(),
            )
        })?;

        let charge = match &mut self.terms {
            ContractTerms::Term { plan, .. } => MessageCharge {
                amount: plan.message_rate,
                overdrawn: false,
            },
            ContractTerms::MonthToMonth { plan } => MessageCharge {
                amount: plan.message_rate,
                overdrawn: false,
            },
            ContractTerms::Prepaid { plan, balance } => {
                *balance -= plan.rate_per_message;
                MessageCharge {
                    amount: plan.rate_per_message,
                    overdrawn: *balance < Decimal::ZERO,
                }
            }
        };

        bill.add_message(charge.amount)?;
        Ok(charge)
    }

    /// Close the open billing month
    ///
    /// Adds the fixed monthly fee as a line item, finalizes the bill, and
    /// moves it out of the contract.
    ///
    /// # Errors
    ///
    /// `InvalidState` if no billing month is open.
    pub fn close_month(&mut self) -> BillingResult<Bill> {
        let mut bill = self.bill.take().ok_or_else(|| {
            BillingError::InvalidState("no billing month is open to close".to_string())
        })?;
        bill.add_fixed_fee(self.monthly_fee())?;
        bill.finalize();
        Ok(bill)
    }

    /// Cancel the contract effective `on` and return the one-time charge
    ///
    /// Term contracts cancelled before their end date owe the plan's
    /// termination fee; it lands on the open bill. Every other case owes
    /// nothing.
    ///
    /// # Errors
    ///
    /// `InvalidState` if the contract is already cancelled or no billing
    /// month is open — the fee must land on the bill covering the
    /// cancellation date.
    pub fn cancel(&mut self, on: NaiveDate) -> BillingResult<Decimal> {
        if self.cancelled_on.is_some() {
            return Err(BillingError::InvalidState(
                "contract is already cancelled".to_string(),
            ));
        }
        let bill = self.bill.as_mut().ok_or_else(|| {
            BillingError::InvalidState(
                "cannot cancel: no billing month is open to charge".to_string(),
            )
        })?;

        let fee = match &self.terms {
            ContractTerms::Term { plan, end, .. } if on < *end => plan.termination_fee,
            _ => Decimal::ZERO,
        };
        if fee > Decimal::ZERO {
            bill.add_one_time("early termination fee", fee)?;
        }
        self.cancelled_on = Some(on);
        Ok(fee)
    }

    /// Credit a prepaid balance and return the new balance
    ///
    /// # Errors
    ///
    /// `InvalidState` for non-prepaid contracts or non-positive amounts.
    pub fn top_up(&mut self, amount: Decimal) -> BillingResult<Decimal> {
        if amount <= Decimal::ZERO {
            return Err(BillingError::InvalidState(
                "top-up amount must be positive".to_string(),
            ));
        }
        match &mut self.terms {
            ContractTerms::Prepaid { balance, .. } => {
                *balance += amount;
                Ok(*balance)
            }
            _ => Err(BillingError::InvalidState(format!(
                "cannot top up a {} contract",
                self.kind()
            ))),
        }
    }
}

/// Term pricing rule: (free minutes applied, billed minutes, charge)
///
/// The allowance never goes negative; only minutes beyond it are charged.
fn rate_term_call(plan: &TermPlan, remaining: u32, minutes: u32) -> (u32, u32, Decimal) {
    let free = remaining.min(minutes);
    let billed = minutes - free;
    (free, billed, Decimal::from(billed) * plan.overage_rate_per_minute)
}
