//! Multi-Room Chat Server - Entry Point
//!
//! Runs with: `chat-rooms-server [port]`, defaulting to port 1500.

use std::env;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use chat_rooms::{ChatServer, ServerConfig};

fn usage() {
    eprintln!("Server usage: > chat-rooms-server [port]");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use RUST_LOG to control log level, e.g. RUST_LOG=chat_rooms=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("chat_rooms=info")),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = match args.as_slice() {
        [] => ServerConfig::default(),
        [port] => match port.parse() {
            Ok(port) => ServerConfig::with_port(port),
            Err(_) => {
                eprintln!("Invalid port number.");
                usage();
                std::process::exit(1);
            }
        },
        _ => {
            usage();
            std::process::exit(1);
        }
    };

    let server = Arc::new(ChatServer::new(config));
    server.run().await?;
    Ok(())
}
