//! Open-stream bookkeeping for one mounted filesystem.
//!
//! The registry never owns sessions: it keeps a `Weak` liveness token per
//! entry, so bookkeeping cannot extend a session's lifetime or prevent its
//! close. Close direction is one-way, session -> registry; the registry
//! never force-closes anything.

use super::{SessionId, SessionKind};
use log::debug;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

/// Liveness token. Each session holds the `Arc` side for its lifetime; the
/// registry holds only the `Weak` side.
#[derive(Debug, Default)]
pub struct SessionToken;

struct Entry {
    kind: SessionKind,
    path: String,
    alive: Weak<SessionToken>,
}

/// Registry of currently open sessions. Shared across all sessions of one
/// client; safe for concurrent registration and deregistration.
#[derive(Default)]
pub struct SessionRegistry {
    next_id: AtomicU64,
    open: Mutex<HashMap<SessionId, Entry>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a session and return its identity within this registry.
    pub fn register(&self, kind: SessionKind, path: &str, token: &Arc<SessionToken>) -> SessionId {
        let id = SessionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.open.lock().unwrap().insert(
            id,
            Entry {
                kind,
                path: path.to_string(),
                alive: Arc::downgrade(token),
            },
        );
        id
    }

    /// Invoked by a session exactly once, on its first close. A no-op for
    /// ids that were never registered or are already gone.
    pub fn notify_closed(&self, id: SessionId) {
        if let Some(entry) = self.open.lock().unwrap().remove(&id) {
            debug!("session {:?} on {} closed", id, entry.path);
        }
    }

    /// Number of registered sessions whose owner is still alive.
    pub fn open_count(&self) -> usize {
        self.open
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.alive.strong_count() > 0)
            .count()
    }

    /// Registered sessions whose owner was dropped without closing. Each one
    /// leaked a remote handle.
    pub fn leaked_count(&self) -> usize {
        self.open
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.alive.strong_count() == 0)
            .count()
    }

    /// Paths with a live open write session, for diagnostics.
    pub fn open_write_paths(&self) -> Vec<String> {
        self.open
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.kind == SessionKind::Write && e.alive.strong_count() > 0)
            .map(|e| e.path.clone())
            .collect()
    }
}
