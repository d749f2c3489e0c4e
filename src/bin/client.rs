//! WebSocket Text Relay - Client Entry Point
//!
//! Prompts for a nickname, connects, and hands off to the interactive
//! session. The console is the UI here, so operator-facing output goes
//! through println/eprintln rather than a tracing subscriber.

use std::env;
use std::io::Write;

use chat_relay::session::{run_session, DEFAULT_URL};

#[tokio::main]
async fn main() {
    let url = env::args().nth(1).unwrap_or_else(|| DEFAULT_URL.to_string());

    print!("Enter your nickname: ");
    let _ = std::io::stdout().flush();

    let mut nickname = String::new();
    if std::io::stdin().read_line(&mut nickname).is_err() {
        eprintln!("Could not read nickname. Exiting...");
        std::process::exit(1);
    }
    let nickname = nickname.trim().to_string();

    if nickname.is_empty() {
        eprintln!("Nickname cannot be empty. Exiting...");
        std::process::exit(1);
    }

    println!("Connecting to the chat...");

    if let Err(e) = run_session(&url, &nickname).await {
        eprintln!("Could not connect to the server: {}", e);
        std::process::exit(1);
    }

    println!("Client has exited.");
}
