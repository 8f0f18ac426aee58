//! Connection capability
//!
//! The session core only sees this seam: a bidirectional, ordered
//! channel of text messages that can be split into a send half and a
//! receive half. The production implementation wraps a WebSocket
//! stream (one text frame per message); tests substitute a
//! channel-backed mock.

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use tracing::debug;

use crate::error::AppError;

/// Send half of a connection
#[async_trait]
pub trait ConnectionTx: Send + 'static {
    /// Deliver one text message to the peer
    async fn send(&mut self, text: &str) -> Result<(), AppError>;

    /// Best-effort liveness check; failures surface on `send`
    fn is_active(&self) -> bool {
        true
    }

    /// Close the connection (idempotent)
    async fn close(&mut self);
}

/// Receive half of a connection
#[async_trait]
pub trait ConnectionRx: Send + 'static {
    /// Block until the next text message arrives
    ///
    /// Returns `ConnectionClosed` once the peer is gone or the read
    /// side fails; every later call fails the same way.
    async fn receive(&mut self) -> Result<String, AppError>;
}

/// A bidirectional, ordered, reliable text-message channel
pub trait Connection: Send + 'static {
    type Tx: ConnectionTx;
    type Rx: ConnectionRx;

    /// Split into independently usable halves
    fn split(self) -> (Self::Tx, Self::Rx);
}

/// WebSocket-backed connection
pub struct WsConnection<S> {
    stream: WebSocketStream<S>,
}

impl<S> WsConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    pub fn new(stream: WebSocketStream<S>) -> Self {
        Self { stream }
    }
}

impl<S> Connection for WsConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    type Tx = WsTx<S>;
    type Rx = WsRx<S>;

    fn split(self) -> (Self::Tx, Self::Rx) {
        let (sink, stream) = self.stream.split();
        (WsTx { sink, closed: false }, WsRx { stream })
    }
}

/// Send half of a [`WsConnection`]
pub struct WsTx<S> {
    sink: SplitSink<WebSocketStream<S>, Message>,
    closed: bool,
}

#[async_trait]
impl<S> ConnectionTx for WsTx<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    async fn send(&mut self, text: &str) -> Result<(), AppError> {
        self.sink
            .send(Message::Text(text.to_string().into()))
            .await
            .map_err(AppError::WebSocket)
    }

    fn is_active(&self) -> bool {
        !self.closed
    }

    async fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            let _ = self.sink.close().await;
        }
    }
}

/// Receive half of a [`WsConnection`]
pub struct WsRx<S> {
    stream: SplitStream<WebSocketStream<S>>,
}

#[async_trait]
impl<S> ConnectionRx for WsRx<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    async fn receive(&mut self) -> Result<String, AppError> {
        while let Some(frame) = self.stream.next().await {
            match frame {
                Ok(Message::Text(text)) => return Ok(text.to_string()),
                Ok(Message::Close(_)) => {
                    debug!("Peer sent close frame");
                    return Err(AppError::ConnectionClosed);
                }
                // Ping/Pong are answered by tungstenite itself; binary
                // frames are not part of the protocol.
                Ok(other) => {
                    debug!("Ignoring non-text frame: {:?}", other);
                }
                Err(e) => return Err(AppError::WebSocket(e)),
            }
        }
        Err(AppError::ConnectionClosed)
    }
}
