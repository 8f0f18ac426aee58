//! Multi-Room Chat Client - Terminal Entry Point
//!
//! Runs with: `chat-rooms-client [username] [port] [address]`,
//! defaulting to `Anonymous`, `1500`, `localhost`. Reads lines from
//! stdin, maps text commands to message kinds, and prints everything
//! the server sends.

use std::env;
use std::io::Write;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use chat_rooms::{ChatMessage, MessageKind};

fn usage() {
    eprintln!("Client usage: > chat-rooms-client [username] [port] [address]");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut username = "Anonymous".to_string();
    let mut port: u16 = 1500;
    let mut address = "localhost".to_string();

    match args.as_slice() {
        [] => {}
        [user] => username = user.clone(),
        [user, p] | [user, p, _] => {
            username = user.clone();
            port = match p.parse() {
                Ok(port) => port,
                Err(_) => {
                    eprintln!("Invalid port number.");
                    usage();
                    std::process::exit(1);
                }
            };
            if let [_, _, addr] = args.as_slice() {
                address = addr.clone();
            }
        }
        _ => {
            usage();
            std::process::exit(1);
        }
    }

    let url = format!("ws://{}:{}", address, port);
    let (ws_stream, _) = match connect_async(&url).await {
        Ok(connected) => connected,
        Err(e) => {
            eprintln!("Sorry, can't find server! ({})", e);
            std::process::exit(1);
        }
    };
    println!("Connected to {}", url);

    let (mut tx, mut rx) = ws_stream.split();

    // Username handshake: a bare text frame before any envelope.
    tx.send(Message::Text(username.clone().into())).await?;

    // Print everything the server sends until the connection ends.
    let printer = tokio::spawn(async move {
        while let Some(frame) = rx.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    let text = text.to_string();
                    if text.ends_with('\n') {
                        print!("{}", text);
                    } else {
                        println!("{}", text);
                    }
                    let _ = std::io::stdout().flush();
                }
                Ok(Message::Close(_)) | Err(_) => break,
                Ok(_) => {}
            }
        }
        println!("Connection closed by server.");
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let msg = ChatMessage::from_input(&line);
        let json = serde_json::to_string(&msg)?;
        tx.send(Message::Text(json.into())).await?;

        if msg.kind == MessageKind::Logout {
            break;
        }
    }

    let _ = tx.close().await;
    printer.abort();
    Ok(())
}
