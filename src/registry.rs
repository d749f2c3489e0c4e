//! Connection registry
//!
//! The only shared mutable state in the server: the set of active
//! connections plus their display names, behind a single mutex. Every
//! operation takes and releases the guard synchronously; nothing here
//! awaits, so the lock is never held across I/O. Broadcast works from a
//! `snapshot` copy rather than iterating the live map.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use crate::message::UNKNOWN_NAME;
use crate::peer::Peer;
use crate::types::ConnectionId;

/// Concurrency-safe set of active connections and their display names
#[derive(Debug, Default)]
pub struct Registry {
    inner: Mutex<HashMap<ConnectionId, Peer>>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to the active set
    ///
    /// No-op if the handle is already registered.
    pub fn register(&self, id: ConnectionId, outbound: mpsc::Sender<Message>) {
        let mut inner = self.inner.lock().expect("registry mutex poisoned");
        inner.entry(id).or_insert_with(|| Peer::new(outbound));
    }

    /// Remove a connection from the active set and the name mapping
    ///
    /// Returns the display name that was removed, or None if the
    /// connection never identified or was already absent. Safe to call
    /// repeatedly for the same handle.
    pub fn deregister(&self, id: ConnectionId) -> Option<String> {
        let mut inner = self.inner.lock().expect("registry mutex poisoned");
        inner.remove(&id).and_then(|peer| peer.nickname)
    }

    /// Record the display name for a connection
    ///
    /// Called at most once per connection in practice; overwrites any
    /// prior value if re-called. No-op for unregistered handles.
    pub fn set_name(&self, id: ConnectionId, nickname: String) {
        let mut inner = self.inner.lock().expect("registry mutex poisoned");
        if let Some(peer) = inner.get_mut(&id) {
            peer.set_nickname(nickname);
        }
    }

    /// Look up a connection's display name
    ///
    /// Returns "Unknown" for unidentified or unregistered handles.
    pub fn name_of(&self, id: ConnectionId) -> String {
        let inner = self.inner.lock().expect("registry mutex poisoned");
        inner
            .get(&id)
            .map(|peer| peer.display_name().to_string())
            .unwrap_or_else(|| UNKNOWN_NAME.to_string())
    }

    /// Point-in-time copy of the active membership
    ///
    /// The returned peers hold cloned queue senders, so callers can fan
    /// out frames without touching the lock again. A snapshot taken while
    /// a registration or removal is in flight may miss or include that
    /// handle, but never sees a partial entry.
    pub fn snapshot(&self) -> Vec<(ConnectionId, Peer)> {
        let inner = self.inner.lock().expect("registry mutex poisoned");
        inner
            .iter()
            .map(|(id, peer)| (*id, peer.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue() -> mpsc::Sender<Message> {
        mpsc::channel(8).0
    }

    #[test]
    fn test_register_and_snapshot() {
        let registry = Registry::new();
        let id = ConnectionId::new();

        registry.register(id, queue());

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].0, id);
    }

    #[test]
    fn test_register_twice_is_noop() {
        let registry = Registry::new();
        let id = ConnectionId::new();

        registry.register(id, queue());
        registry.set_name(id, "alice".to_string());
        registry.register(id, queue());

        assert_eq!(registry.snapshot().len(), 1);
        // Second register must not have replaced the identified peer
        assert_eq!(registry.name_of(id), "alice");
    }

    #[test]
    fn test_deregister_returns_recorded_name() {
        let registry = Registry::new();
        let id = ConnectionId::new();

        registry.register(id, queue());
        registry.set_name(id, "alice".to_string());

        assert_eq!(registry.deregister(id), Some("alice".to_string()));
        assert!(registry.snapshot().is_empty());
    }

    #[test]
    fn test_deregister_unidentified_returns_none() {
        let registry = Registry::new();
        let id = ConnectionId::new();

        registry.register(id, queue());

        assert_eq!(registry.deregister(id), None);
    }

    #[test]
    fn test_deregister_absent_is_noop() {
        let registry = Registry::new();

        assert_eq!(registry.deregister(ConnectionId::new()), None);
    }

    #[test]
    fn test_name_of_unknown() {
        let registry = Registry::new();
        let id = ConnectionId::new();

        assert_eq!(registry.name_of(id), "Unknown");

        registry.register(id, queue());
        assert_eq!(registry.name_of(id), "Unknown");

        registry.set_name(id, "bob".to_string());
        assert_eq!(registry.name_of(id), "bob");
    }

    #[test]
    fn test_snapshot_excludes_deregistered() {
        let registry = Registry::new();
        let a = ConnectionId::new();
        let b = ConnectionId::new();

        registry.register(a, queue());
        registry.register(b, queue());
        registry.deregister(a);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].0, b);
    }
}
