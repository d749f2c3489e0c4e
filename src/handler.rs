//! WebSocket connection handler
//!
//! Owns the lifecycle of a single connection: the handshake, registration,
//! the receive loop with its identity-then-chat state machine, and the
//! idempotent teardown that every exit path funnels into.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::protocol::WebSocketConfig;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::broadcast::broadcast;
use crate::error::AppError;
use crate::message;
use crate::registry::Registry;
use crate::types::ConnectionId;

/// Upper bound on one inbound message, fragments reassembled
///
/// The transport rejects anything larger instead of truncating it.
const MAX_MESSAGE_BYTES: usize = 64 * 1024;

/// Outbound queue depth per connection
const OUTBOUND_BUFFER: usize = 32;

/// Receive-loop state of one connection
///
/// The first text frame is the identity; everything after it is chat.
/// Leaving the receive loop is the terminal state and always runs
/// teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectionState {
    /// No identity frame seen yet
    AwaitingIdentity,
    /// Identified; frames are chat text
    Active,
}

fn ws_config() -> WebSocketConfig {
    let mut config = WebSocketConfig::default();
    config.max_message_size = Some(MAX_MESSAGE_BYTES);
    config.max_frame_size = Some(MAX_MESSAGE_BYTES);
    config
}

/// Handle a new TCP connection
///
/// Performs the WebSocket handshake, registers the connection, then runs
/// the receive loop until the peer closes or errors. All frames going the
/// other way are queued to a writer task that owns the sink, so two
/// overlapping broadcasts can never interleave bytes on one socket.
pub async fn handle_connection(stream: TcpStream, registry: &Registry) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    debug!("New TCP connection from {}", peer_addr);

    // WebSocket handshake; non-upgrade requests fail here and are answered
    // by tungstenite with a client-error response.
    let ws_stream =
        tokio_tungstenite::accept_async_with_config(stream, Some(ws_config())).await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let conn_id = ConnectionId::new();
    info!("Connection {} established from {}", conn_id, peer_addr);

    // The registry holds the only sender; deregistration drops it, which
    // ends the writer task and closes the socket gracefully.
    let (out_tx, mut out_rx) = mpsc::channel::<Message>(OUTBOUND_BUFFER);
    registry.register(conn_id, out_tx);

    let write_task = tokio::spawn(async move {
        while let Some(msg) = out_rx.recv().await {
            if ws_sender.send(msg).await.is_err() {
                debug!("WebSocket send failed, ending write task");
                break;
            }
        }
        debug!("Write task ended for connection");

        // Close handshake once the queue is done
        let _ = ws_sender.close().await;
    });

    let mut state = ConnectionState::AwaitingIdentity;

    while let Some(frame) = ws_receiver.next().await {
        match frame {
            Ok(Message::Text(text)) => match state {
                ConnectionState::AwaitingIdentity => {
                    let nickname = text.trim().to_string();
                    registry.set_name(conn_id, nickname.clone());
                    state = ConnectionState::Active;

                    info!("Connection {} identified as '{}'", conn_id, nickname);
                    broadcast(registry, &message::joined(&nickname), Some(conn_id)).await;
                }
                ConnectionState::Active => {
                    let sender_name = registry.name_of(conn_id);
                    let line = message::chat(&sender_name, &text);

                    debug!("Relaying from {}: {}", conn_id, line);
                    broadcast(registry, &line, Some(conn_id)).await;
                }
            },
            Ok(Message::Close(_)) => {
                debug!("Connection {} sent close frame", conn_id);
                break;
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                // Pong replies are handled by tungstenite
            }
            Ok(_) => {
                // Binary frames are ignored
            }
            Err(e) => {
                warn!("WebSocket error on {}: {}", conn_id, e);
                break;
            }
        }
    }

    teardown(registry, conn_id).await;

    // Writer finishes once deregistration drops its sender
    let _ = write_task.await;

    info!("Connection {} closed", conn_id);
    Ok(())
}

/// Tear down a connection
///
/// Deregisters first, then announces the departure, so the leaving
/// connection is out of the active set before anyone hears about it and
/// can never receive its own leave message. Calling this twice for the
/// same handle has the effect of calling it once: the second deregister
/// finds nothing and announces nothing. Connections that never identified
/// (or identified as a blank name) leave silently.
async fn teardown(registry: &Registry, conn_id: ConnectionId) {
    if let Some(nickname) = registry.deregister(conn_id) {
        if !nickname.is_empty() {
            broadcast(registry, &message::left(&nickname), Some(conn_id)).await;
        }
    }
}
