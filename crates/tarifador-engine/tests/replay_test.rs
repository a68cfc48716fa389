//! End-to-end replay scenarios against in-memory customers

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use tarifador_core::models::{
    BillingPeriod, Contract, Customer, Event, MtmPlan, PhoneLine, PrepaidPlan, TermPlan,
};
use tarifador_core::BillingError;
use tarifador_engine::BillingEngine;

const TERM_LINE: &str = "934-555-0001";
const PREPAID_LINE: &str = "934-555-0002";
const MTM_LINE: &str = "934-555-0010";

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2018, m, d, h, 0, 0).unwrap()
}

fn term_plan() -> TermPlan {
    TermPlan {
        monthly_fee: dec!(20.00),
        included_minutes: 100,
        overage_rate_per_minute: dec!(0.10),
        message_rate: Decimal::ZERO,
        termination_fee: dec!(280.00),
    }
}

fn prepaid_plan() -> PrepaidPlan {
    PrepaidPlan {
        rate_per_minute: dec!(0.10),
        rate_per_message: dec!(0.05),
    }
}

fn fleet(prepaid_balance: Decimal) -> Vec<Customer> {
    let mut lucia = Customer::new(7721, "Lucía Paredes");
    lucia.add_line(PhoneLine::new(
        TERM_LINE,
        Contract::term(term_plan(), day(2018, 1, 1), day(2019, 12, 30)),
    ));
    lucia.add_line(PhoneLine::new(
        PREPAID_LINE,
        Contract::prepaid(prepaid_plan(), day(2018, 1, 1), prepaid_balance),
    ));

    let mut marco = Customer::new(3041, "Marco Quispe");
    marco.add_line(PhoneLine::new(
        MTM_LINE,
        Contract::month_to_month(MtmPlan::default(), day(2018, 1, 1)),
    ));

    vec![lucia, marco]
}

#[test]
fn month_rollover_closes_previous_bill_before_billing() {
    let mut customers = fleet(dec!(100.00));
    let jan = BillingPeriod::new(2018, 1);
    let feb = BillingPeriod::new(2018, 2);

    let events = vec![
        Event::call(TERM_LINE, MTM_LINE, at(1, 5, 9), 3000), // 50 min, all free
        Event::call(TERM_LINE, MTM_LINE, at(1, 20, 9), 4200), // 70 min: 50 free + 20 overage
        Event::call(TERM_LINE, MTM_LINE, at(2, 3, 9), 600),  // 10 min, new month
    ];

    let report = BillingEngine::new().replay(&events, &mut customers).unwrap();

    let jan_bill = report.bill(TERM_LINE, jan).expect("january bill");
    assert!(jan_bill.is_finalized());
    assert_eq!(jan_bill.free_minutes_used(), 100);
    assert_eq!(jan_bill.overage_minutes(), 20);
    assert_eq!(jan_bill.overage_charge(), dec!(2.00));
    assert_eq!(jan_bill.fixed_fees(), dec!(20.00));
    assert_eq!(jan_bill.total(), dec!(22.00));

    // The allowance reset for February before the triggering event applied
    let feb_bill = report.bill(TERM_LINE, feb).expect("february bill");
    assert_eq!(feb_bill.free_minutes_used(), 10);
    assert_eq!(feb_bill.overage_minutes(), 0);
    assert_eq!(feb_bill.total(), dec!(20.00));

    assert_eq!(report.periods(), vec![jan, feb]);

    // The line retained both finalized bills as well
    let line = customers[0].line(TERM_LINE).unwrap();
    assert_eq!(line.bills().len(), 2);
    assert_eq!(line.bill_for(jan).unwrap().total(), dec!(22.00));
}

#[test]
fn out_of_order_event_aborts_the_replay() {
    let mut customers = fleet(dec!(100.00));
    let events = vec![
        Event::call(TERM_LINE, MTM_LINE, at(1, 20, 9), 60),
        Event::call(TERM_LINE, MTM_LINE, at(1, 5, 9), 60), // regression
    ];

    let err = BillingEngine::new().replay(&events, &mut customers).unwrap_err();
    assert!(matches!(err, BillingError::OutOfOrder { .. }));
}

#[test]
fn months_without_events_produce_no_bill() {
    let mut customers = fleet(dec!(100.00));
    let events = vec![
        Event::call(MTM_LINE, TERM_LINE, at(1, 5, 9), 60),
        Event::call(MTM_LINE, TERM_LINE, at(3, 5, 9), 60), // february skipped
    ];

    let report = BillingEngine::new().replay(&events, &mut customers).unwrap();
    assert!(report.bill(MTM_LINE, BillingPeriod::new(2018, 1)).is_some());
    assert!(report.bill(MTM_LINE, BillingPeriod::new(2018, 2)).is_none());
    assert!(report.bill(MTM_LINE, BillingPeriod::new(2018, 3)).is_some());
}

#[test]
fn prepaid_overdraft_accrues_debt_by_default() {
    // $10.00 of credit, then a 120 minute call at $0.10
    let mut customers = fleet(dec!(10.00));
    let events = vec![Event::call(PREPAID_LINE, MTM_LINE, at(1, 5, 9), 7200)];

    let report = BillingEngine::new().replay(&events, &mut customers).unwrap();
    assert_eq!(report.stats().overdraft_events, 1);
    assert_eq!(report.stats().events_dropped, 0);

    let contract = customers[0].line(PREPAID_LINE).unwrap().contract();
    assert_eq!(contract.balance(), Some(dec!(-2.00)));

    let bill = report
        .bill(PREPAID_LINE, BillingPeriod::new(2018, 1))
        .unwrap();
    assert_eq!(bill.total(), dec!(12.00));
    assert_eq!(bill.fixed_fees(), Decimal::ZERO);
}

#[test]
fn halt_policy_stops_billing_an_overdrawn_line() {
    let mut customers = fleet(dec!(10.00));
    let events = vec![
        Event::call(PREPAID_LINE, MTM_LINE, at(1, 5, 9), 7200), // overdraws to -2.00
        Event::call(PREPAID_LINE, MTM_LINE, at(1, 6, 9), 600),  // dropped under the policy
        Event::message(PREPAID_LINE, MTM_LINE, at(1, 7, 9)),    // dropped as well
    ];

    let engine = BillingEngine::new().halt_overdrawn_lines(true);
    let report = engine.replay(&events, &mut customers).unwrap();

    assert_eq!(report.stats().events_dropped, 2);
    let contract = customers[0].line(PREPAID_LINE).unwrap().contract();
    assert_eq!(contract.balance(), Some(dec!(-2.00)));
}

#[test]
fn events_sharing_a_timestamp_keep_input_order() {
    // Under the halt policy the first of two simultaneous calls overdraws
    // and the second is dropped; a swapped order would bill the small call.
    let mut customers = fleet(dec!(10.00));
    let when = at(1, 5, 9);
    let events = vec![
        Event::call(PREPAID_LINE, MTM_LINE, when, 7200), // $12.00, overdraws
        Event::call(PREPAID_LINE, MTM_LINE, when, 600),  // $1.00, must be dropped
    ];

    let engine = BillingEngine::new().halt_overdrawn_lines(true);
    let report = engine.replay(&events, &mut customers).unwrap();

    assert_eq!(report.stats().events_dropped, 1);
    let contract = customers[0].line(PREPAID_LINE).unwrap().contract();
    assert_eq!(contract.balance(), Some(dec!(-2.00)));
}

#[test]
fn closed_bills_do_not_change_after_rollover() {
    let mut customers = fleet(dec!(100.00));
    let jan = BillingPeriod::new(2018, 1);
    let events = vec![
        Event::call(MTM_LINE, TERM_LINE, at(1, 5, 9), 1200),
        Event::call(MTM_LINE, TERM_LINE, at(2, 5, 9), 6000),
        Event::call(MTM_LINE, TERM_LINE, at(2, 20, 9), 6000),
    ];

    let report = BillingEngine::new().replay(&events, &mut customers).unwrap();

    // 20 minutes at $0.05 plus the $50.00 monthly fee, untouched by February
    let jan_bill = report.bill(MTM_LINE, jan).unwrap();
    assert!(jan_bill.is_finalized());
    assert_eq!(jan_bill.total(), dec!(51.00));
}

#[test]
fn replay_is_idempotent_on_fresh_state() {
    let events = vec![
        Event::call(TERM_LINE, MTM_LINE, at(1, 5, 9), 3000),
        Event::message(PREPAID_LINE, TERM_LINE, at(1, 6, 9)),
        Event::call(MTM_LINE, PREPAID_LINE, at(2, 2, 9), 4200),
        Event::call(PREPAID_LINE, MTM_LINE, at(2, 9, 9), 1800),
    ];

    let run = |events: &[Event]| {
        let mut customers = fleet(dec!(50.00));
        let report = BillingEngine::new().replay(events, &mut customers).unwrap();
        report
            .iter()
            .map(|(number, period, bill)| (number.to_string(), period, bill.total()))
            .collect::<Vec<_>>()
    };

    assert_eq!(run(&events), run(&events));
}

#[test]
fn customer_totals_sum_their_lines() {
    let mut customers = fleet(dec!(100.00));
    let jan = BillingPeriod::new(2018, 1);
    let events = vec![
        Event::call(TERM_LINE, MTM_LINE, at(1, 5, 9), 3000), // within allowance
        Event::call(PREPAID_LINE, MTM_LINE, at(1, 6, 9), 1200), // 20 min -> $2.00
        Event::call(MTM_LINE, TERM_LINE, at(1, 7, 9), 600),  // 10 min -> $0.50
    ];

    let report = BillingEngine::new().replay(&events, &mut customers).unwrap();

    // Term: fee only (20.00); prepaid: usage only (2.00)
    assert_eq!(report.customer_total(&customers[0], jan), dec!(22.00));
    // Month-to-month: fee 50.00 + 0.50
    assert_eq!(report.customer_total(&customers[1], jan), dec!(50.50));
}
