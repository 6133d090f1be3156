//! In-memory [`AttendanceStore`], for tests and offline demos of the kiosk.

use crate::error::{Result, TimeclockError};
use crate::hours::{record_id_order, HoursRecord, NewHoursRecord, Signup};
use crate::store::AttendanceStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Inner {
    names: HashMap<String, String>,
    signups: HashMap<String, Vec<Signup>>,
    records: Vec<HoursRecord>,
    next_id: u64,
    writes: usize,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn add_member(&self, member_id: &str, name: &str) {
        self.lock()
            .names
            .insert(member_id.to_string(), name.to_string());
    }

    pub fn add_signup(&self, member_id: &str, name: &str, event_id: i64, eid: &str) {
        let mut inner = self.lock();
        inner.next_id += 1;
        let signup = Signup {
            record_id: inner.next_id.to_string(),
            name: name.to_string(),
            event_id,
            eid: eid.to_string(),
        };
        inner
            .signups
            .entry(member_id.to_string())
            .or_default()
            .push(signup);
    }

    /// Drop every open signup for `member_id`, as when an organizer closes
    /// the event roster.
    pub fn close_signups(&self, member_id: &str) {
        self.lock().signups.remove(member_id);
    }

    /// Seed an existing hours record. Does not count as a write.
    pub fn insert_record(&self, record: HoursRecord) {
        self.lock().records.push(record);
    }

    pub fn records(&self) -> Vec<HoursRecord> {
        self.lock().records.clone()
    }

    /// Number of create/close calls served so far.
    pub fn writes(&self) -> usize {
        self.lock().writes
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn member_name(&self, member_id: &str) -> Result<String> {
        self.lock()
            .names
            .get(member_id)
            .cloned()
            .ok_or_else(|| TimeclockError::MemberNotFound(member_id.to_string()))
    }

    async fn open_signups(&self, member_id: &str) -> Result<Vec<Signup>> {
        Ok(self
            .lock()
            .signups
            .get(member_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn todays_hours_record(
        &self,
        member_id: &str,
        event_id: i64,
        date: &str,
    ) -> Result<Option<HoursRecord>> {
        Ok(self
            .lock()
            .records
            .iter()
            .filter(|r| r.member_id == member_id && r.event_id == event_id && r.date == date)
            .min_by(|a, b| record_id_order(&a.record_id, &b.record_id))
            .cloned())
    }

    async fn create_hours_record(&self, record: &NewHoursRecord) -> Result<HoursRecord> {
        let mut inner = self.lock();
        inner.next_id += 1;
        inner.writes += 1;
        let created = record.clone().into_record(inner.next_id.to_string());
        inner.records.push(created.clone());
        Ok(created)
    }

    async fn close_hours_record(
        &self,
        record: &HoursRecord,
        end_time: &str,
    ) -> Result<HoursRecord> {
        let mut inner = self.lock();
        inner.writes += 1;
        let stored = inner
            .records
            .iter_mut()
            .find(|r| r.record_id == record.record_id)
            .ok_or_else(|| TimeclockError::Remote {
                url: format!("memory://hours/{}", record.record_id),
                status: 404,
                message: "no such record".to_string(),
            })?;
        stored.end_time = Some(end_time.to_string());
        Ok(stored.clone())
    }
}
