//! Companion client session
//!
//! Connects, sends the identity frame, then runs two activities until one
//! of them ends: a receive loop that prints incoming text to the console
//! (the console is the client's UI) and a send loop that reads operator
//! lines from stdin. `/exit` ends the session with a graceful close.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::error::AppError;

/// Default server URL
pub const DEFAULT_URL: &str = "ws://127.0.0.1:5000/";

/// Literal operator command that ends the session (case-insensitive)
pub const EXIT_COMMAND: &str = "/exit";

/// How long to wait for the server's close reply after we initiate one
const CLOSE_GRACE: Duration = Duration::from_secs(1);

/// Run one interactive chat session against `url`
///
/// Returns an error only if the connection or the identity send fails;
/// everything after that is reported on the console and ends the session
/// cleanly.
pub async fn run_session(url: &str, nickname: &str) -> Result<(), AppError> {
    let (ws_stream, _response) = connect_async(url).await?;
    println!("Successfully connected to the server!");

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // First frame is the identity
    ws_sender.send(Message::text(nickname)).await?;

    let mut recv_task = tokio::spawn(async move {
        while let Some(frame) = ws_receiver.next().await {
            match frame {
                Ok(Message::Text(text)) => println!("{}", text),
                Ok(Message::Close(_)) => {
                    println!("Server closed the connection.");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    eprintln!("Error receiving message: {}", e);
                    break;
                }
            }
        }
    });

    println!("Type your message and press Enter to send. Type /exit to leave.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut server_closed = false;

    loop {
        tokio::select! {
            _ = &mut recv_task => {
                server_closed = true;
                break;
            }
            line = lines.next_line() => {
                match line {
                    Ok(Some(input)) => {
                        if input.trim().is_empty() {
                            continue;
                        }
                        if input.eq_ignore_ascii_case(EXIT_COMMAND) {
                            break;
                        }
                        // Chat text goes out verbatim, untrimmed
                        if ws_sender.send(Message::text(input)).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        eprintln!("Error reading input: {}", e);
                        break;
                    }
                }
            }
        }
    }

    // Initiate the close handshake and give the server a moment to answer
    let _ = ws_sender.close().await;
    if !server_closed {
        let _ = tokio::time::timeout(CLOSE_GRACE, &mut recv_task).await;
        recv_task.abort();
    }

    Ok(())
}
