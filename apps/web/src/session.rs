//! # Sessions
//!
//! Per-visitor state: the cart, the service-type preference, pending
//! notices and the checkout token.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  request without cookie ──► new SessionId, Set-Cookie: bistro_session  │
//! │                                                                         │
//! │  POST /cart/add      ──► store.update(cart.add)                        │
//! │                          push_notice("X added to cart!")                │
//! │  GET  /menu          ──► take_notices (drained, shown once)            │
//! │  GET  /cart          ──► issue_checkout_token                          │
//! │  POST /orders        ──► take_checkout_token (atomic compare + remove) │
//! │                          success: ordered lines removed                 │
//! │                          rejection: restore_checkout_token             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store is a trait so the in-process [`MemorySessionStore`] can be
//! swapped for a shared store without touching the services. Sessions idle
//! past [`DEFAULT_IDLE_TIMEOUT`] are forgotten.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use bistro_core::{Cart, ServiceType};
use serde::Serialize;
use tokio::time::MissedTickBehavior;
use tracing::debug;
use uuid::Uuid;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "bistro_session";

// =============================================================================
// Session Id
// =============================================================================

/// Opaque session identifier (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generates a fresh random id.
    pub fn new() -> Self {
        SessionId(Uuid::new_v4())
    }

    /// Parses a cookie value. Anything that isn't a UUID yields `None`.
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value.trim()).ok().map(SessionId)
    }

    /// `Set-Cookie` header value for this id.
    pub fn cookie(&self) -> String {
        format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, self.0)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// =============================================================================
// Notices
// =============================================================================

/// Which banner a notice belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// Order placed.
    Success,
    /// Any rejected action.
    Error,
    /// Item added to the cart.
    Cart,
    /// Service type chosen.
    Service,
}

/// A message shown once on the next rendered view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Notice {
            kind,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice::new(NoticeKind::Error, message)
    }
}

// =============================================================================
// Session
// =============================================================================

/// Everything remembered about one visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub cart: Cart,

    /// Last chosen service type, if any.
    pub service_type: Option<ServiceType>,

    /// Pending one-shot notices, oldest first.
    pub notices: Vec<Notice>,

    /// Token issued by the last cart view; a checkout must echo it.
    pub checkout_token: Option<String>,
}

// =============================================================================
// Session Store
// =============================================================================

/// Storage for sessions keyed by [`SessionId`].
///
/// Unknown and expired ids read as an empty session. Every change goes
/// through [`update`](SessionStore::update), which applies the whole
/// read-modify-write in one step, so two requests on the same session
/// can't undo each other's changes.
pub trait SessionStore: Send + Sync {
    /// A copy of the session.
    fn get(&self, id: SessionId) -> Session;

    /// Runs `f` on the session, starting from an empty one if needed.
    fn update(&self, id: SessionId, f: &mut dyn FnMut(&mut Session));

    fn clear(&self, id: SessionId);

    fn push_notice(&self, id: SessionId, notice: Notice) {
        let mut notice = Some(notice);
        self.update(id, &mut |session: &mut Session| session.notices.extend(notice.take()));
    }

    /// Removes and returns all pending notices.
    fn take_notices(&self, id: SessionId) -> Vec<Notice> {
        let mut notices = Vec::new();
        self.update(id, &mut |session: &mut Session| {
            notices = std::mem::take(&mut session.notices);
        });
        notices
    }

    /// Issues a new checkout token, replacing any previous one.
    fn issue_checkout_token(&self, id: SessionId) -> String {
        let token = Uuid::new_v4().to_string();
        self.update(id, &mut |session: &mut Session| {
            session.checkout_token = Some(token.clone());
        });
        token
    }

    /// Consumes the checkout token if it matches `token`.
    ///
    /// Returns `false` (and leaves the session alone) when there is no
    /// token or it differs.
    fn take_checkout_token(&self, id: SessionId, token: &str) -> bool {
        let mut taken = false;
        self.update(id, &mut |session: &mut Session| {
            taken = session.checkout_token.as_deref() == Some(token);
            if taken {
                session.checkout_token = None;
            }
        });
        taken
    }

    /// Puts back a token taken by a checkout that was then rejected, unless
    /// a newer one has been issued meanwhile.
    fn restore_checkout_token(&self, id: SessionId, token: &str) {
        self.update(id, &mut |session: &mut Session| {
            if session.checkout_token.is_none() {
                session.checkout_token = Some(token.to_string());
            }
        });
    }
}

/// Sessions idle longer than this are dropped (`BISTRO_SESSION_IDLE_SECS`).
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(24 * 60);

#[derive(Debug)]
struct Entry {
    session: Session,
    last_seen: Instant,
}

/// In-process session store.
///
/// A session expires once it has not been read or updated for the idle
/// timeout. Expired entries are dropped when next touched or by
/// [`sweep_expired`](MemorySessionStore::sweep_expired). A session left
/// empty by an update is removed right away.
#[derive(Debug)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<SessionId, Entry>>,
    idle_timeout: Duration,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        MemorySessionStore {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, Entry>> {
        // Session updates don't panic, so a poisoned map is still consistent.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_live(&self, entry: &Entry, now: Instant) -> bool {
        now.duration_since(entry.last_seen) < self.idle_timeout
    }

    /// Drops every expired session and returns how many went.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, entry| self.is_live(entry, now));
        before - sessions.len()
    }

    /// Number of stored sessions, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, id: SessionId) -> Session {
        let now = Instant::now();
        let mut sessions = self.lock();

        match sessions.get_mut(&id) {
            Some(entry) if self.is_live(entry, now) => {
                entry.last_seen = now;
                entry.session.clone()
            }
            _ => {
                sessions.remove(&id);
                Session::default()
            }
        }
    }

    fn update(&self, id: SessionId, f: &mut dyn FnMut(&mut Session)) {
        let now = Instant::now();
        let mut sessions = self.lock();

        let entry = sessions.entry(id).or_insert_with(|| Entry {
            session: Session::default(),
            last_seen: now,
        });
        if !self.is_live(entry, now) {
            entry.session = Session::default();
        }
        entry.last_seen = now;

        f(&mut entry.session);

        if entry.session == Session::default() {
            sessions.remove(&id);
        }
    }

    fn clear(&self, id: SessionId) {
        self.lock().remove(&id);
    }
}

/// Calls [`MemorySessionStore::sweep_expired`] every `period`. Runs until
/// the task is aborted.
pub async fn sweep_idle_sessions(store: Arc<MemorySessionStore>, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let removed = store.sweep_expired();
        if removed > 0 {
            debug!(removed, remaining = store.len(), "Dropped idle sessions");
        }
    }
}
