use crate::error::{Result, TimeclockError};
use crate::store::AttendanceStore;
use serde::{Deserialize, Serialize};

/// The member currently at the kiosk, plus the events they can pick from.
///
/// One of these lives per browser session; nothing here is shared between
/// requests from different sessions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Member {
    prefix: String,
    member_id: Option<String>,
    /// Event display name to event id, in signup order. A name seen twice
    /// keeps its first position and its last id.
    events: Vec<(String, i64)>,
}

impl Member {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            member_id: None,
            events: Vec::new(),
        }
    }

    pub fn member_id(&self) -> Option<&str> {
        self.member_id.as_deref()
    }

    /// Accept `id` only if it carries the configured prefix. On rejection the
    /// current id is kept as it was.
    pub fn set_member_id(&mut self, id: &str) -> Result<()> {
        let id = id.trim();
        if !is_valid_member_id(id, &self.prefix) {
            tracing::debug!(id, prefix = %self.prefix, "rejected member id");
            return Err(TimeclockError::InvalidMemberId {
                id: id.to_string(),
                prefix: self.prefix.clone(),
            });
        }
        if self.member_id.as_deref() != Some(id) {
            self.events.clear();
        }
        tracing::info!(member_id = id, "member id set");
        self.member_id = Some(id.to_string());
        Ok(())
    }

    pub fn reset(&mut self) {
        self.member_id = None;
        self.events.clear();
    }

    pub async fn name(&self, store: &dyn AttendanceStore) -> Result<String> {
        let id = self.require_id()?;
        store.member_name(id).await
    }

    /// Refresh the event cache from the member's open signups and return the
    /// event names. Empty when no member is set.
    pub async fn load_events(&mut self, store: &dyn AttendanceStore) -> Result<Vec<String>> {
        let Some(id) = self.member_id.as_deref() else {
            return Ok(Vec::new());
        };
        let signups = store.open_signups(id).await?;
        self.events.clear();
        for signup in signups {
            match self.events.iter_mut().find(|(name, _)| *name == signup.name) {
                Some(entry) => entry.1 = signup.event_id,
                None => self.events.push((signup.name, signup.event_id)),
            }
        }
        Ok(self.event_names())
    }

    pub fn event_names(&self) -> Vec<String> {
        self.events.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn event_id(&self, name: &str) -> Result<i64> {
        self.events
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, id)| *id)
            .ok_or_else(|| TimeclockError::EventNotFound(name.to_string()))
    }

    fn require_id(&self) -> Result<&str> {
        self.member_id
            .as_deref()
            .ok_or_else(|| TimeclockError::InvalidMemberId {
                id: String::new(),
                prefix: self.prefix.clone(),
            })
    }
}

/// A member id is any non-empty string starting with the prefix, the bare
/// prefix included.
pub fn is_valid_member_id(id: &str, prefix: &str) -> bool {
    !id.is_empty() && id.starts_with(prefix)
}
