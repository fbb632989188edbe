use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Event names of the connection handshake.
pub mod events {
    pub const CHALLENGE: &str = "challenge";
    pub const AUTHORIZED: &str = "authorized";
    pub const UNAUTHORIZED: &str = "unauthorized";
}

/// One named message on a socket, in either direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocketEvent {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl SocketEvent {
    pub fn new(event: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    pub fn bare(event: impl Into<String>) -> Self {
        Self::new(event, serde_json::Value::Null)
    }

    pub fn is(&self, name: &str) -> bool {
        self.event == name
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SocketTransportError {
    #[error("Connection closed")]
    Closed,
    #[error("Malformed frame: {0}")]
    Malformed(String),
    #[error("Transport error: {0}")]
    Io(String),
}

/// A single client connection as seen by the handshake and message handlers.
#[async_trait]
pub trait SocketTransport: Send {
    /// Stable per-connection identifier, for logs.
    fn connection_id(&self) -> &str;

    async fn emit(&mut self, event: SocketEvent) -> Result<(), SocketTransportError>;

    /// Next inbound event. `None` once the peer has gone away.
    async fn next_event(&mut self) -> Option<Result<SocketEvent, SocketTransportError>>;
}
