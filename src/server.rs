//! Listener loop
//!
//! Accepts TCP connections forever and spawns one handler task per
//! connection. The loop never awaits a handler and a bad peer cannot take
//! it down; only a failed bind (before this loop starts) is fatal.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};

use crate::handler::handle_connection;
use crate::registry::Registry;

/// Run the accept loop on an already-bound listener
///
/// Each accepted connection gets its own task for the handshake and the
/// receive loop; handler errors are logged there and stay there.
pub async fn serve(listener: TcpListener, registry: Arc<Registry>) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                info!("New connection from {}", addr);
                let registry = Arc::clone(&registry);

                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, &registry).await {
                        error!("Connection handler error: {}", e);
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}
