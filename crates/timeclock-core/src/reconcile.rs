//! Clock-in / clock-out decision for one member at one event.
//!
//! Per member, event and day a record moves `none -> open -> completed`.
//! Attempts that would skip or repeat a step leave the store untouched and
//! only produce a message.

use crate::error::{Result, TimeclockError};
use crate::hours::{HoursRecord, NewHoursRecord, ShiftState};
use crate::store::AttendanceStore;
use crate::time::LocalTime;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    ClockedIn { record: HoursRecord },
    ClockedOut { record: HoursRecord },
    /// Clock-out refused: the shift started less than the dwell minimum ago.
    AlreadyClockedIn { minutes: i64 },
    AlreadyClockedOut,
}

impl Outcome {
    pub fn message(&self) -> &'static str {
        match self {
            Outcome::ClockedIn { .. } => "Clocked in successfully.",
            Outcome::ClockedOut { .. } => "Clocked out successfully.",
            Outcome::AlreadyClockedIn { .. } => "You are already clocked in.",
            Outcome::AlreadyClockedOut => "You have already clocked out.",
        }
    }

    pub fn record(&self) -> Option<&HoursRecord> {
        match self {
            Outcome::ClockedIn { record } | Outcome::ClockedOut { record } => Some(record),
            _ => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

// ---------------------------------------------------------------------------
// Reconciler
// ---------------------------------------------------------------------------

pub struct Reconciler<'a> {
    store: &'a dyn AttendanceStore,
    time: &'a LocalTime,
    min_dwell_minutes: i64,
}

impl<'a> Reconciler<'a> {
    pub fn new(store: &'a dyn AttendanceStore, time: &'a LocalTime, min_dwell_minutes: i64) -> Self {
        Self {
            store,
            time,
            min_dwell_minutes,
        }
    }

    /// Clock the member in if they have no record for this event today,
    /// otherwise clock them out once the dwell minimum has passed.
    pub async fn log_hours(&self, member_id: &str, event_id: i64) -> Result<Outcome> {
        let today = self.time.today();
        let existing = self
            .store
            .todays_hours_record(member_id, event_id, &today)
            .await?;

        let Some(record) = existing else {
            return self.clock_in(member_id, event_id, today).await;
        };

        match record.state() {
            ShiftState::Completed => {
                tracing::info!(member_id, event_id, record_id = %record.record_id, "already clocked out");
                Ok(Outcome::AlreadyClockedOut)
            }
            ShiftState::Open => {
                let minutes = self.time.minutes_since(&record.start_time)?;
                if minutes < 0 {
                    tracing::warn!(
                        member_id,
                        event_id,
                        start_time = %record.start_time,
                        "shift start is later than now; treating as still clocked in"
                    );
                }
                if minutes < self.min_dwell_minutes {
                    tracing::info!(member_id, event_id, minutes, "clock-out refused, dwell not reached");
                    return Ok(Outcome::AlreadyClockedIn { minutes });
                }
                let end_time = self.time.now();
                let closed = self.store.close_hours_record(&record, &end_time).await?;
                tracing::info!(member_id, event_id, record_id = %closed.record_id, %end_time, "clocked out");
                Ok(Outcome::ClockedOut { record: closed })
            }
        }
    }

    async fn clock_in(&self, member_id: &str, event_id: i64, date: String) -> Result<Outcome> {
        let signups = self.store.open_signups(member_id).await?;
        let signup = signups
            .into_iter()
            .next()
            .ok_or_else(|| TimeclockError::NoOpenSignup(member_id.to_string()))?;

        let new = NewHoursRecord {
            eid: signup.eid,
            member_id: member_id.to_string(),
            event_id,
            date,
            start_time: self.time.now(),
        };
        let record = self.store.create_hours_record(&new).await?;
        tracing::info!(member_id, event_id, record_id = %record.record_id, start_time = %record.start_time, "clocked in");
        Ok(Outcome::ClockedIn { record })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
