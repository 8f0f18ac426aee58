//! Shared test support: a channel-backed Connection for driving real
//! sessions without a network.

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};

use chat_rooms::connection::{Connection, ConnectionRx, ConnectionTx};
use chat_rooms::AppError;

/// Build a mock connection plus the test's ends of it: a sender that
/// feeds the session's receive loop and a receiver that collects
/// everything the session puts on the wire.
pub fn mock_connection() -> (MockConnection, mpsc::Sender<String>, mpsc::Receiver<String>) {
    let (input_tx, input_rx) = mpsc::channel(64);
    let (output_tx, output_rx) = mpsc::channel(64);
    let (closed_tx, closed_rx) = watch::channel(false);
    let conn = MockConnection {
        tx: MockTx {
            output: output_tx,
            closed: closed_tx,
        },
        rx: MockRx {
            input: input_rx,
            closed: closed_rx,
        },
    };
    (conn, input_tx, output_rx)
}

pub struct MockConnection {
    tx: MockTx,
    rx: MockRx,
}

impl Connection for MockConnection {
    type Tx = MockTx;
    type Rx = MockRx;

    fn split(self) -> (Self::Tx, Self::Rx) {
        (self.tx, self.rx)
    }
}

pub struct MockTx {
    output: mpsc::Sender<String>,
    closed: watch::Sender<bool>,
}

#[async_trait]
impl ConnectionTx for MockTx {
    async fn send(&mut self, text: &str) -> Result<(), AppError> {
        if *self.closed.borrow() {
            return Err(AppError::ConnectionClosed);
        }
        self.output
            .send(text.to_string())
            .await
            .map_err(|_| AppError::ConnectionClosed)
    }

    fn is_active(&self) -> bool {
        !*self.closed.borrow()
    }

    async fn close(&mut self) {
        let _ = self.closed.send(true);
    }
}

pub struct MockRx {
    input: mpsc::Receiver<String>,
    closed: watch::Receiver<bool>,
}

#[async_trait]
impl ConnectionRx for MockRx {
    async fn receive(&mut self) -> Result<String, AppError> {
        if *self.closed.borrow() {
            return Err(AppError::ConnectionClosed);
        }
        tokio::select! {
            _ = self.closed.changed() => Err(AppError::ConnectionClosed),
            line = self.input.recv() => line.ok_or(AppError::ConnectionClosed),
        }
    }
}
