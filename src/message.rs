//! Wire message formatting
//!
//! The relay speaks plain UTF-8 text frames: one WebSocket text frame is
//! one logical message, with no envelope around it. Everything the server
//! sends is one of three shapes, produced here.

/// Sentinel name for a connection that never identified
pub const UNKNOWN_NAME: &str = "Unknown";

/// Join announcement, broadcast when a connection identifies
pub fn joined(nickname: &str) -> String {
    format!("[{}] joined the chat", nickname)
}

/// Leave announcement, broadcast when an identified connection goes away
pub fn left(nickname: &str) -> String {
    format!("[{}] left the chat", nickname)
}

/// Chat relay line: the sender's name plus the body, untouched.
///
/// Only the nickname was trimmed at identification time; chat bodies are
/// forwarded exactly as received.
pub fn chat(sender: &str, body: &str) -> String {
    format!("[{}]: {}", sender, body)
}
