//! Peer struct definition
//!
//! Represents one registered connection as the rest of the server sees it:
//! its display name (if identified yet) and the outbound frame queue owned
//! by the connection's writer task.

use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use crate::error::SendError;
use crate::message::UNKNOWN_NAME;

/// Registered peer information
///
/// The sender half of the peer's outbound queue lives here; the receiver
/// half is drained by a writer task that owns the WebSocket sink, so all
/// frames to one connection are serialized regardless of how many
/// broadcasts overlap.
#[derive(Debug, Clone)]
pub struct Peer {
    /// Display name (None before the identity frame arrives)
    pub nickname: Option<String>,
    /// Outbound frame queue feeding this connection's writer task
    outbound: mpsc::Sender<Message>,
}

impl Peer {
    /// Create a new unidentified peer with the given outbound queue
    pub fn new(outbound: mpsc::Sender<Message>) -> Self {
        Self {
            nickname: None,
            outbound,
        }
    }

    /// Queue a frame for this peer
    ///
    /// Returns an error if the writer task is gone (connection closed).
    pub async fn send(&self, msg: Message) -> Result<(), SendError> {
        self.outbound
            .send(msg)
            .await
            .map_err(|_| SendError::ChannelClosed)
    }

    /// Whether this peer's connection is still open
    pub fn is_open(&self) -> bool {
        !self.outbound.is_closed()
    }

    /// Get the display name for this peer
    ///
    /// Returns the nickname if set, otherwise "Unknown".
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(UNKNOWN_NAME)
    }

    /// Check if this peer has identified yet
    pub fn has_identified(&self) -> bool {
        self.nickname.is_some()
    }

    /// Set the peer's display name
    pub fn set_nickname(&mut self, nickname: String) {
        self.nickname = Some(nickname);
    }
}
