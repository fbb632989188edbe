//! Websocket endpoint: challenge handshake, then guarded message dispatch.
//!
//! Frames are JSON text `{ "event": ..., "data": ... }` in both directions.

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use civic_application::{AuthorizedSocket, SocketGuard, SocketHandshake, build_guard};
use civic_core::{
    Decision, GuardConfigError, GuardOptions, SessionStore, SocketEvent, SocketTransport,
    SocketTransportError,
};

use crate::config::WebConfig;

pub const WHOAMI_EVENT: &str = "session:whoami";

/// A websocket as seen by the handshake and the message loop.
pub struct AxumSocket {
    id: String,
    socket: WebSocket,
}

impl AxumSocket {
    pub fn new(socket: WebSocket) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            socket,
        }
    }

    pub async fn close(&mut self) {
        if let Err(e) = self.socket.send(Message::Close(None)).await {
            tracing::debug!(sock_id = %self.id, error = %e, "Close frame not delivered");
        }
    }
}

#[async_trait::async_trait]
impl SocketTransport for AxumSocket {
    fn connection_id(&self) -> &str {
        &self.id
    }

    async fn emit(&mut self, event: SocketEvent) -> Result<(), SocketTransportError> {
        let text = serde_json::to_string(&event)
            .map_err(|e| SocketTransportError::Malformed(e.to_string()))?;
        self.socket
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| SocketTransportError::Io(e.to_string()))
    }

    async fn next_event(&mut self) -> Option<Result<SocketEvent, SocketTransportError>> {
        loop {
            let message = match self.socket.recv().await? {
                Ok(message) => message,
                Err(e) => return Some(Err(SocketTransportError::Io(e.to_string()))),
            };

            match message {
                Message::Text(text) => {
                    return Some(
                        serde_json::from_str(text.as_str())
                            .map_err(|e| SocketTransportError::Malformed(e.to_string())),
                    );
                }
                Message::Binary(_) => {
                    return Some(Err(SocketTransportError::Malformed(
                        "binary frame".to_owned(),
                    )));
                }
                Message::Close(_) => return None,
                Message::Ping(_) | Message::Pong(_) => continue,
            }
        }
    }
}

/// Handles an allowed message and returns the `ack` payload.
pub type SocketHandler =
    Arc<dyn Fn(&AuthorizedSocket, serde_json::Value) -> serde_json::Value + Send + Sync>;

struct Registered {
    guard: SocketGuard,
    handler: SocketHandler,
}

/// Message handlers of an authorized socket, each behind its own guard.
#[derive(Default)]
pub struct SocketHandlers {
    handlers: HashMap<String, Registered>,
}

impl SocketHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handlers every socket gets: `session:whoami`.
    pub fn with_builtin() -> Result<Self, GuardConfigError> {
        let whoami = build_guard(GuardOptions::new("socket-session").socket())?.into_socket()?;

        Ok(Self::new().register(
            WHOAMI_EVENT,
            whoami,
            Arc::new(|socket: &AuthorizedSocket, _data: serde_json::Value| {
                serde_json::to_value(socket.identity()).unwrap_or_default()
            }),
        ))
    }

    pub fn register(
        mut self,
        event: impl Into<String>,
        guard: SocketGuard,
        handler: SocketHandler,
    ) -> Self {
        self.handlers
            .insert(event.into(), Registered { guard, handler });
        self
    }

    /// Runs one inbound message through its guard and handler.
    ///
    /// Replies with `<event>:ack` on success and `<event>:error` otherwise.
    pub async fn dispatch<T: SocketTransport>(
        &self,
        socket: &AuthorizedSocket,
        event: SocketEvent,
        transport: &mut T,
    ) -> Result<(), SocketTransportError> {
        let Some(registered) = self.handlers.get(&event.event) else {
            tracing::debug!(event = %event.event, "Unknown socket event");
            return transport
                .emit(error_reply(&event.event, "Unknown event"))
                .await;
        };

        let mut denial = None;
        let reply = match registered.guard.authorize(socket, |err| denial = Some(err)) {
            Decision::Allow => SocketEvent::new(
                format!("{}:ack", event.event),
                (registered.handler)(socket, event.data),
            ),
            Decision::Deny(_) => error_reply(
                &event.event,
                denial.map_or("Not Allowed", |err| err.message()),
            ),
        };

        transport.emit(reply).await
    }
}

fn error_reply(event: &str, message: &str) -> SocketEvent {
    SocketEvent::new(
        format!("{event}:error"),
        serde_json::json!({ "error": message }),
    )
}

pub type SocketState<S> = (S, Arc<SocketHandlers>, Arc<WebConfig>);

pub async fn socket<S>(
    State((store, handlers, config)): State<SocketState<S>>,
    ws: WebSocketUpgrade,
) -> Response
where
    S: SessionStore + Clone + 'static,
{
    let challenge_timeout = config.challenge_timeout;
    ws.on_upgrade(move |socket| {
        serve_socket(AxumSocket::new(socket), store, handlers, challenge_timeout)
    })
}

/// Drives one connection: nothing but the handshake runs until it accepts.
pub async fn serve_socket<S>(
    mut transport: AxumSocket,
    store: S,
    handlers: Arc<SocketHandlers>,
    challenge_timeout: Duration,
) where
    S: SessionStore,
{
    let authorized = match SocketHandshake::new(&mut transport, &store, challenge_timeout)
        .run()
        .await
    {
        Ok(authorized) => authorized,
        Err(_) => {
            transport.close().await;
            return;
        }
    };

    while let Some(frame) = transport.next_event().await {
        let result = match frame {
            Ok(event) => handlers.dispatch(&authorized, event, &mut transport).await,
            Err(SocketTransportError::Malformed(reason)) => {
                tracing::debug!(
                    sock_id = authorized.connection_id(),
                    reason = %reason,
                    "Dropping malformed frame"
                );
                Ok(())
            }
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            tracing::debug!(sock_id = authorized.connection_id(), error = %e, "Socket closed");
            break;
        }
    }
}
