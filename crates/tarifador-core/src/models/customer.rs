//! Customer model

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::BillingResult;

use super::line::PhoneLine;
use super::period::BillingPeriod;

/// A customer and the phone lines they own
#[derive(Debug, Clone)]
pub struct Customer {
    id: u32,
    name: String,
    lines: Vec<PhoneLine>,
}

impl Customer {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            lines: Vec::new(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_line(&mut self, line: PhoneLine) {
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[PhoneLine] {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut [PhoneLine] {
        &mut self.lines
    }

    /// Line numbers owned by this customer
    pub fn numbers(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.number())
    }

    pub fn line(&self, number: &str) -> Option<&PhoneLine> {
        self.lines.iter().find(|l| l.number() == number)
    }

    pub fn line_mut(&mut self, number: &str) -> Option<&mut PhoneLine> {
        self.lines.iter_mut().find(|l| l.number() == number)
    }

    /// Cancel one of this customer's lines; returns the one-time charge
    ///
    /// The line and its history are retained for reporting.
    ///
    /// # Errors
    ///
    /// `UnknownLine` if the customer does not own `number`; lifecycle errors
    /// propagate from the contract.
    pub fn cancel_line(&mut self, number: &str, on: NaiveDate) -> BillingResult<Decimal> {
        let line = self
            .line_mut(number)
            .ok_or_else(|| crate::BillingError::UnknownLine(number.to_string()))?;
        line.cancel(on)
    }

    /// Total charge across this customer's lines for one month
    ///
    /// Sums the finalized bills; lines without a bill for the month
    /// contribute nothing.
    pub fn monthly_total(&self, period: BillingPeriod) -> Decimal {
        self.lines
            .iter()
            .filter_map(|l| l.bill_for(period))
            .map(|b| b.total())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contract::Contract;
    use crate::models::plan::{MtmPlan, TermPlan};
    use rust_decimal_macros::dec;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn customer_with_two_lines() -> Customer {
        let mut customer = Customer::new(7721, "Lucía Paredes");
        customer.add_line(PhoneLine::new(
            "934-0001",
            Contract::term(TermPlan::default(), day(2018, 1, 1), day(2019, 12, 30)),
        ));
        customer.add_line(PhoneLine::new(
            "934-0002",
            Contract::month_to_month(MtmPlan::default(), day(2018, 1, 1)),
        ));
        customer
    }

    #[test]
    fn test_line_lookup() {
        let customer = customer_with_two_lines();
        assert!(customer.line("934-0001").is_some());
        assert!(customer.line("934-9999").is_none());
        assert_eq!(customer.numbers().count(), 2);
    }

    #[test]
    fn test_monthly_total_sums_finalized_bills() {
        let mut customer = customer_with_two_lines();
        let jan = BillingPeriod::new(2018, 1);

        for line in customer.lines_mut() {
            line.start_cycle(jan).unwrap();
            line.close_cycle().unwrap();
        }

        // Term fee 20.00 + month-to-month fee 50.00
        assert_eq!(customer.monthly_total(jan), dec!(70.00));
        // No bills for February
        assert_eq!(customer.monthly_total(BillingPeriod::new(2018, 2)), Decimal::ZERO);
    }

    #[test]
    fn test_cancel_line_unknown_number() {
        let mut customer = customer_with_two_lines();
        assert!(matches!(
            customer.cancel_line("934-9999", day(2018, 3, 1)),
            Err(crate::BillingError::UnknownLine(_))
        ));
    }
}
