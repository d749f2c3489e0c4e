//! Real-Time WebSocket Text Relay Library
//!
//! A minimal chat relay built with tokio-tungstenite: the server accepts
//! persistent connections, takes each connection's first text frame as its
//! display name, and rebroadcasts every later frame to all other
//! connections.
//!
//! # Features
//! - WebSocket connection handling
//! - Nickname setup via the first frame
//! - Join/leave announcements
//! - Best-effort broadcast fan-out with origin exclusion
//! - Disconnection handling with idempotent teardown
//! - Companion terminal client
//!
//! # Architecture
//! Shared state lives in a single [`Registry`] (active connections plus
//! display names) behind a mutex that is never held across I/O. Each
//! connection runs two tasks: the handler, which drives the receive loop,
//! and a writer, which owns the sink and drains a per-connection queue so
//! concurrent broadcasts cannot interleave frames on one socket.
//!
//! # Example
//! ```ignore
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//! use chat_relay::{serve, Registry};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:5000").await.unwrap();
//!     let registry = Arc::new(Registry::new());
//!     serve(listener, registry).await;
//! }
//! ```

pub mod broadcast;
pub mod error;
pub mod handler;
pub mod message;
pub mod peer;
pub mod registry;
pub mod server;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use broadcast::broadcast;
pub use error::{AppError, SendError};
pub use handler::handle_connection;
pub use peer::Peer;
pub use registry::Registry;
pub use server::serve;
pub use session::run_session;
pub use types::ConnectionId;
