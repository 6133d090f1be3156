//! Per-browser kiosk sessions.
//!
//! Each browser gets a `timeclock_session` cookie holding a random id; the
//! member scanned in that browser lives in [`SessionStore`] under that id.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::response::Response;
use tokio::sync::RwLock;
use uuid::Uuid;

use timeclock_core::member::Member;

pub const SESSION_COOKIE: &str = "timeclock_session";

struct Entry {
    member: Member,
    last_seen: Instant,
}

/// Members by session id. Entries idle for longer than the store's TTL are
/// treated as absent and dropped on the next write.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Entry>>>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_ttl(Duration::from_secs(30 * 60))
    }
}

impl SessionStore {
    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            inner: Arc::default(),
            idle_ttl,
        }
    }

    fn is_live(&self, entry: &Entry) -> bool {
        entry.last_seen.elapsed() < self.idle_ttl
    }

    pub async fn get(&self, id: Uuid) -> Option<Member> {
        let map = self.inner.read().await;
        map.get(&id)
            .filter(|e| self.is_live(e))
            .map(|e| e.member.clone())
    }

    pub async fn put(&self, id: Uuid, member: Member) {
        let mut map = self.inner.write().await;
        let before = map.len();
        map.retain(|_, e| self.is_live(e));
        if map.len() < before {
            tracing::debug!(evicted = before - map.len(), "idle sessions dropped");
        }
        map.insert(
            id,
            Entry {
                member,
                last_seen: Instant::now(),
            },
        );
    }

    /// Store `member` only while the session still holds the same member id.
    /// A reset or rescan that landed in the meantime is kept.
    pub async fn put_if_current(&self, id: Uuid, member: Member) -> bool {
        let mut map = self.inner.write().await;
        let Some(entry) = map.get_mut(&id) else {
            return false;
        };
        if !self.is_live(entry) || entry.member.member_id() != member.member_id() {
            return false;
        }
        entry.member = member;
        entry.last_seen = Instant::now();
        true
    }

    pub async fn remove(&self, id: Uuid) {
        self.inner.write().await.remove(&id);
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

/// The session a request belongs to. A request without a valid cookie gets
/// a fresh id, which [`Session::attach`] hands back to the browser.
#[derive(Debug, Clone, Copy)]
pub struct Session {
    pub id: Uuid,
    pub is_new: bool,
}

impl Session {
    /// Set the session cookie on `response` if this session is new.
    pub fn attach(&self, mut response: Response) -> Response {
        if self.is_new {
            let cookie = format!("{SESSION_COOKIE}={}; HttpOnly; SameSite=Lax; Path=/", self.id);
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().append(SET_COOKIE, value);
            }
        }
        response
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let existing = parts
            .headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(session_id_from_cookies);
        Ok(match existing {
            Some(id) => Session { id, is_new: false },
            None => Session {
                id: Uuid::new_v4(),
                is_new: true,
            },
        })
    }
}

fn session_id_from_cookies(header: &str) -> Option<Uuid> {
    header.split(';').find_map(|part| {
        part.trim()
            .strip_prefix(SESSION_COOKIE)
            .and_then(|rest| rest.strip_prefix('='))
            .and_then(|val| Uuid::parse_str(val.trim()).ok())
    })
}
