//! Wall-clock helpers in the configured timezone.
//!
//! The remote store keeps dates and times as formatted local strings, so
//! everything here speaks in those strings rather than in instants.

use crate::config::ClockConfig;
use crate::error::{Result, TimeclockError};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::sync::{Arc, Mutex};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(Mutex::new(at))
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut guard = self.0.lock().unwrap_or_else(|e| e.into_inner());
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Formats the current date and time-of-day in one timezone.
#[derive(Clone)]
pub struct LocalTime {
    tz: Tz,
    date_format: String,
    time_format: String,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for LocalTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalTime")
            .field("tz", &self.tz)
            .field("date_format", &self.date_format)
            .field("time_format", &self.time_format)
            .finish_non_exhaustive()
    }
}

impl LocalTime {
    pub fn new(cfg: &ClockConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let tz: Tz = cfg
            .timezone
            .parse()
            .map_err(|_| TimeclockError::InvalidTimezone(cfg.timezone.clone()))?;
        check_format(&cfg.date_format)?;
        check_format(&cfg.time_format)?;
        Ok(Self {
            tz,
            date_format: cfg.date_format.clone(),
            time_format: cfg.time_format.clone(),
            clock,
        })
    }

    pub fn system(cfg: &ClockConfig) -> Result<Self> {
        Self::new(cfg, Arc::new(SystemClock))
    }

    pub fn local_now(&self) -> DateTime<Tz> {
        self.clock.now().with_timezone(&self.tz)
    }

    /// Today's date, e.g. `2026/10/18`.
    pub fn today(&self) -> String {
        self.local_now().format(&self.date_format).to_string()
    }

    /// The current time of day, e.g. `09:41`.
    pub fn now(&self) -> String {
        self.local_now().format(&self.time_format).to_string()
    }

    /// Whole minutes elapsed since `past`, a time of day assumed to be today.
    ///
    /// A shift that started before midnight is not handled: `past` is pinned
    /// to today's date, so the result goes negative.
    pub fn minutes_since(&self, past: &str) -> Result<i64> {
        let invalid = || TimeclockError::InvalidTime {
            value: past.to_string(),
            format: self.time_format.clone(),
        };
        let time = NaiveTime::parse_from_str(past.trim(), &self.time_format)
            .map_err(|_| invalid())?;
        let now = self.local_now();
        let start = self
            .tz
            .from_local_datetime(&now.date_naive().and_time(time))
            .earliest()
            .ok_or_else(invalid)?;
        Ok((now - start).num_minutes())
    }
}

/// Reject strftime patterns chrono would fail to render.
pub fn check_format(pattern: &str) -> Result<()> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(TimeclockError::InvalidFormat(pattern.to_string()));
    }
    Ok(())
}
