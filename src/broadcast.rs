//! Broadcast engine
//!
//! Best-effort fan-out of one text frame to every open connection except
//! the originator. Works from a registry snapshot so the lock is released
//! before any send; delivery failures are logged per recipient and never
//! abort the rest of the fan-out.

use tokio_tungstenite::tungstenite::Message;
use tracing::warn;

use crate::registry::Registry;
use crate::types::ConnectionId;

/// Deliver `text` to every registered open connection except `exclude`
///
/// `exclude` is `None` for server-origin announcements with no
/// originator. Callers get no per-recipient result; a recipient whose
/// queue is gone is skipped and logged.
pub async fn broadcast(registry: &Registry, text: &str, exclude: Option<ConnectionId>) {
    let recipients = registry.snapshot();
    let msg = Message::text(text);

    for (id, peer) in recipients {
        if Some(id) == exclude {
            continue;
        }
        if !peer.is_open() {
            continue;
        }
        if let Err(e) = peer.send(msg.clone()).await {
            warn!("Dropping broadcast to {}: {}", id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;
    use tokio_tungstenite::tungstenite::Message;

    use super::*;

    fn text_of(msg: Message) -> String {
        match msg {
            Message::Text(text) => text.to_string(),
            other => panic!("expected text frame, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_broadcast_excludes_origin() {
        let registry = Registry::new();
        let a = ConnectionId::new();
        let b = ConnectionId::new();
        let c = ConnectionId::new();

        let (tx_a, mut rx_a) = mpsc::channel(8);
        let (tx_b, mut rx_b) = mpsc::channel(8);
        let (tx_c, mut rx_c) = mpsc::channel(8);
        registry.register(a, tx_a);
        registry.register(b, tx_b);
        registry.register(c, tx_c);

        broadcast(&registry, "hello", Some(a)).await;

        assert_eq!(text_of(rx_b.recv().await.unwrap()), "hello");
        assert_eq!(text_of(rx_c.recv().await.unwrap()), "hello");
        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_without_origin_reaches_all() {
        let registry = Registry::new();
        let a = ConnectionId::new();
        let b = ConnectionId::new();

        let (tx_a, mut rx_a) = mpsc::channel(8);
        let (tx_b, mut rx_b) = mpsc::channel(8);
        registry.register(a, tx_a);
        registry.register(b, tx_b);

        broadcast(&registry, "announcement", None).await;

        assert_eq!(text_of(rx_a.recv().await.unwrap()), "announcement");
        assert_eq!(text_of(rx_b.recv().await.unwrap()), "announcement");
    }

    #[tokio::test]
    async fn test_broadcast_skips_closed_recipient() {
        let registry = Registry::new();
        let a = ConnectionId::new();
        let dead = ConnectionId::new();
        let c = ConnectionId::new();

        let (tx_a, _rx_a) = mpsc::channel(8);
        let (tx_dead, rx_dead) = mpsc::channel(8);
        let (tx_c, mut rx_c) = mpsc::channel(8);
        registry.register(a, tx_a);
        registry.register(dead, tx_dead);
        registry.register(c, tx_c);

        // Simulate a torn-down writer task
        drop(rx_dead);

        broadcast(&registry, "still here", Some(a)).await;

        assert_eq!(text_of(rx_c.recv().await.unwrap()), "still here");
    }
}
