//! Communication event model
//!
//! Represents a single call or text message between two lines. Events are
//! immutable once created and are the unit of input for the replay engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::period::BillingPeriod;

/// Event kind discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Voice call with a duration
    Call,
    /// Text message, duration-independent
    #[serde(alias = "sms")]
    Message,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Call => write!(f, "call"),
            EventKind::Message => write!(f, "message"),
        }
    }
}

/// A communication event between two lines
///
/// Durations are recorded in seconds, as delivered by the switch; billing is
/// per started minute (see [`Event::billable_minutes`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Originating line number
    pub src_number: String,

    /// Destination line number
    pub dst_number: String,

    /// When the event occurred
    pub time: DateTime<Utc>,

    /// Call or message
    pub kind: EventKind,

    /// Duration in seconds; 0 for messages
    pub duration_secs: u32,
}

impl Event {
    /// Create a call event
    pub fn call(
        src_number: impl Into<String>,
        dst_number: impl Into<String>,
        time: DateTime<Utc>,
        duration_secs: u32,
    ) -> Self {
        Self {
            src_number: src_number.into(),
            dst_number: dst_number.into(),
            time,
            kind: EventKind::Call,
            duration_secs,
        }
    }

    /// Create a message event
    pub fn message(
        src_number: impl Into<String>,
        dst_number: impl Into<String>,
        time: DateTime<Utc>,
    ) -> Self {
        Self {
            src_number: src_number.into(),
            dst_number: dst_number.into(),
            time,
            kind: EventKind::Message,
            duration_secs: 0,
        }
    }

    /// The billing period this event falls into
    #[inline]
    pub fn billing_period(&self) -> BillingPeriod {
        BillingPeriod::from_datetime(self.time)
    }

    /// Duration rounded up to whole minutes
    ///
    /// A started minute is billed in full; a zero-second event bills zero
    /// minutes.
    #[inline]
    pub fn billable_minutes(&self) -> u32 {
        (self.duration_secs + 59) / 60
    }

    /// Check if this is a call
    #[inline]
    pub fn is_call(&self) -> bool {
        matches!(self.kind, EventKind::Call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 1, 3, h, m, s).unwrap()
    }

    #[test]
    fn test_billable_minutes_rounds_up() {
        let call = Event::call("555-0001", "555-0002", at(10, 0, 0), 61);
        assert_eq!(call.billable_minutes(), 2);

        let call = Event::call("555-0001", "555-0002", at(10, 0, 0), 60);
        assert_eq!(call.billable_minutes(), 1);

        let call = Event::call("555-0001", "555-0002", at(10, 0, 0), 1);
        assert_eq!(call.billable_minutes(), 1);
    }

    #[test]
    fn test_message_bills_zero_minutes() {
        let msg = Event::message("555-0001", "555-0002", at(10, 0, 0));
        assert_eq!(msg.billable_minutes(), 0);
        assert!(!msg.is_call());
    }

    #[test]
    fn test_billing_period() {
        let call = Event::call("555-0001", "555-0002", at(23, 59, 59), 30);
        assert_eq!(call.billing_period(), BillingPeriod::new(2018, 1));
    }

    #[test]
    fn test_kind_deserializes_sms_alias() {
        let kind: EventKind = serde_json::from_str("\"sms\"").unwrap();
        assert_eq!(kind, EventKind::Message);

        let kind: EventKind = serde_json::from_str("\"call\"").unwrap();
        assert_eq!(kind, EventKind::Call);
    }
}
