//! Server bootstrap
//!
//! Owns the registry and the id sequence, accepts connections, and
//! spawns one session task per client. Shutdown stops the accept loop
//! and closes every session reachable through the registry.

use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info};

use crate::config::ServerConfig;
use crate::connection::WsConnection;
use crate::error::AppError;
use crate::registry::RoomRegistry;
use crate::session;
use crate::types::IdSequence;

/// The chat server: registry, id sequence, and accept loop
pub struct ChatServer {
    config: ServerConfig,
    registry: Arc<RoomRegistry>,
    ids: IdSequence,
}

impl ChatServer {
    /// Create a server; the registry starts with the default room
    pub fn new(config: ServerConfig) -> Self {
        let registry = Arc::new(RoomRegistry::new(config.delivery_timeout));
        Self {
            config,
            registry,
            ids: IdSequence::new(),
        }
    }

    /// The server's room registry
    pub fn registry(&self) -> Arc<RoomRegistry> {
        Arc::clone(&self.registry)
    }

    /// Bind the listener and accept connections until ctrl-c
    ///
    /// A bind failure is fatal and aborts startup. On shutdown the
    /// accept loop stops first, then every connected session is closed.
    pub async fn run(self: Arc<Self>) -> Result<(), AppError> {
        let addr = self.config.bind_addr();
        let listener = TcpListener::bind(&addr).await?;
        info!("Chat server listening on {}", addr);

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        debug!("New connection from {}", peer);
                        let server = Arc::clone(&self);
                        tokio::spawn(async move {
                            if let Err(e) = server.handle(stream).await {
                                debug!("Session from {} ended with error: {}", peer, e);
                            }
                        });
                    }
                    Err(e) => {
                        error!("Failed to accept connection: {}", e);
                    }
                },
            }
        }

        self.registry.close_all().await;
        Ok(())
    }

    /// Upgrade one accepted stream and run its session to completion
    async fn handle(&self, stream: TcpStream) -> Result<(), AppError> {
        let ws_stream = tokio_tungstenite::accept_async(stream).await?;
        let conn = WsConnection::new(ws_stream);
        let id = self.ids.next_id();
        session::run(conn, id, self.registry(), self.config.clone()).await
    }
}
