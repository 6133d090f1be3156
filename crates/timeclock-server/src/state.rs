use std::sync::Arc;
use std::time::Duration;

use timeclock_core::config::Config;
use timeclock_core::member::Member;
use timeclock_core::ragic::RagicClient;
use timeclock_core::store::AttendanceStore;
use timeclock_core::time::LocalTime;

use crate::session::SessionStore;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn AttendanceStore>,
    pub time: Arc<LocalTime>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn AttendanceStore>, time: LocalTime) -> Self {
        let idle = Duration::from_secs(config.server.session_idle_minutes.saturating_mul(60));
        Self {
            config: Arc::new(config),
            store,
            time: Arc::new(time),
            sessions: SessionStore::with_idle_ttl(idle),
        }
    }

    /// State backed by the Ragic tables named in `config`, on the wall clock.
    pub fn from_config(config: Config) -> timeclock_core::Result<Self> {
        let store = RagicClient::from_config(&config)?;
        let time = LocalTime::system(&config.clock)?;
        Ok(Self::new(config, Arc::new(store), time))
    }

    /// A blank member for a fresh or reset session.
    pub fn new_member(&self) -> Member {
        Member::new(self.config.members.id_prefix.clone())
    }
}
