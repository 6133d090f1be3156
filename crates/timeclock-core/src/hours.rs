use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Signup
// ---------------------------------------------------------------------------

/// A member's open registration for an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signup {
    pub record_id: String,
    /// Display name shown on the kiosk ("Opportunity").
    pub name: String,
    pub event_id: i64,
    /// Internal event-session id, required to create an hours record.
    pub eid: String,
}

// ---------------------------------------------------------------------------
// ShiftState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftState {
    Open,
    Completed,
}

impl ShiftState {
    /// The status label the remote store uses.
    pub fn as_str(self) -> &'static str {
        match self {
            ShiftState::Open => "Incomplete",
            ShiftState::Completed => "Completed",
        }
    }
}

impl fmt::Display for ShiftState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// HoursRecord
// ---------------------------------------------------------------------------

/// One clock-in/clock-out session of a member at an event on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursRecord {
    pub record_id: String,
    pub member_id: String,
    pub event_id: i64,
    pub date: String,
    pub start_time: String,
    pub end_time: Option<String>,
}

impl HoursRecord {
    /// Derived from the end time alone; the store's own status column is
    /// never consulted.
    pub fn state(&self) -> ShiftState {
        match self.end_time.as_deref() {
            Some(t) if !t.trim().is_empty() => ShiftState::Completed,
            _ => ShiftState::Open,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state() == ShiftState::Open
    }
}

/// Fields for a record about to be created on clock-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHoursRecord {
    pub eid: String,
    pub member_id: String,
    pub event_id: i64,
    pub date: String,
    pub start_time: String,
}

impl NewHoursRecord {
    pub fn into_record(self, record_id: impl Into<String>) -> HoursRecord {
        HoursRecord {
            record_id: record_id.into(),
            member_id: self.member_id,
            event_id: self.event_id,
            date: self.date,
            start_time: self.start_time,
            end_time: None,
        }
    }
}

/// Order record ids numerically where possible, so "9" sorts before "10".
pub fn record_id_order(a: &str, b: &str) -> std::cmp::Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}
