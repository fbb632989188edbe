use std::time::Duration;

use civic_core::{
    HandshakeEffect, HandshakeEvent, HandshakeMachine, HandshakeRejection, HandshakeState,
    SessionStore, SessionToken, SocketEvent, SocketTransport, SocketTransportError, Udo,
    ports::socket::events,
};

use super::session_serializer::{SessionSerializer, SessionSerializerError};

/// A connection that completed the handshake.
///
/// Only [`SocketHandshake::run`] hands these out, so message handlers can
/// never see a socket that skipped it.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizedSocket {
    connection_id: String,
    identity: Option<Udo>,
}

impl AuthorizedSocket {
    pub(crate) fn new(connection_id: String, identity: Option<Udo>) -> Self {
        Self {
            connection_id,
            identity,
        }
    }

    pub fn connection_id(&self) -> &str {
        &self.connection_id
    }

    /// Identity bound from the session. `None` for anonymous sessions.
    pub fn identity(&self) -> Option<&Udo> {
        self.identity.as_ref()
    }
}

/// Challenge/response handshake binding a socket to an existing session.
///
/// The server sends a content-free `challenge`; the client must answer with
/// its session token within the timeout. The token is not bound to the
/// challenge, so a captured token can be replayed.
pub struct SocketHandshake<'a, T, S> {
    transport: &'a mut T,
    session_store: &'a S,
    challenge_timeout: Duration,
    machine: HandshakeMachine,
    serializer: SessionSerializer,
}

impl<'a, T, S> SocketHandshake<'a, T, S>
where
    T: SocketTransport,
    S: SessionStore,
{
    pub fn new(transport: &'a mut T, session_store: &'a S, challenge_timeout: Duration) -> Self {
        Self {
            transport,
            session_store,
            challenge_timeout,
            machine: HandshakeMachine::new(),
            serializer: SessionSerializer,
        }
    }

    /// Runs the handshake to its single outcome.
    ///
    /// Consumes the handshake, so the outcome can only be awaited once.
    #[tracing::instrument(
        name = "SocketHandshake::run",
        skip(self),
        fields(sock_id = %self.transport.connection_id(), role = %self.session_store.role())
    )]
    pub async fn run(mut self) -> Result<AuthorizedSocket, HandshakeRejection> {
        if let Err(e) = self.transport.emit(SocketEvent::bare(events::CHALLENGE)).await {
            tracing::debug!(error = %e, "Could not send challenge");
            self.dispatch(HandshakeEvent::Closed).await;
            return self.finish();
        }

        // Dropping the timeout future when it completes is what stops the timer.
        let reply = tokio::time::timeout(self.challenge_timeout, self.await_reply()).await;

        let reply = match reply {
            Err(_elapsed) => {
                self.dispatch(HandshakeEvent::TimedOut).await;
                return self.finish();
            }
            Ok(None) => {
                self.dispatch(HandshakeEvent::Closed).await;
                return self.finish();
            }
            Ok(Some(reply)) => reply,
        };

        self.dispatch(HandshakeEvent::ReplyReceived).await;
        let event = Self::verify(self.session_store, self.serializer, reply).await;
        self.dispatch(event).await;

        self.finish()
    }

    /// Waits for the client's `challenge` reply, skipping anything else.
    async fn await_reply(&mut self) -> Option<Result<serde_json::Value, SocketTransportError>> {
        loop {
            match self.transport.next_event().await? {
                Ok(event) if event.is(events::CHALLENGE) => return Some(Ok(event.data)),
                Ok(event) => {
                    tracing::debug!(event = %event.event, "Ignoring event before handshake");
                }
                Err(SocketTransportError::Malformed(reason)) => {
                    return Some(Err(SocketTransportError::Malformed(reason)));
                }
                Err(_) => return None,
            }
        }
    }

    /// Checks the reply and resolves its token.
    ///
    /// Takes no `&self`: the transport need not be `Sync` for the handshake
    /// future to be `Send`.
    async fn verify(
        session_store: &S,
        serializer: SessionSerializer,
        reply: Result<serde_json::Value, SocketTransportError>,
    ) -> HandshakeEvent {
        let token = match reply {
            Ok(serde_json::Value::String(raw)) => SessionToken::parse(&raw),
            _ => None,
        };
        let Some(token) = token else {
            return HandshakeEvent::Failed(HandshakeRejection::MalformedResponse);
        };

        let record = match session_store.get(&token).await {
            Ok(Some(record)) => record,
            Ok(None) => return HandshakeEvent::Failed(HandshakeRejection::UnknownToken),
            Err(e) => return HandshakeEvent::Failed(HandshakeRejection::StoreError(e.to_string())),
        };

        match serializer.restore(record) {
            Ok(identity) => HandshakeEvent::Resolved(identity),
            Err(SessionSerializerError::NotAnObject) => {
                HandshakeEvent::Failed(HandshakeRejection::UnknownToken)
            }
            Err(e) => HandshakeEvent::Failed(HandshakeRejection::StoreError(e.to_string())),
        }
    }

    /// Applies `event` and performs the resulting effect, if any.
    async fn dispatch(&mut self, event: HandshakeEvent) {
        let Some(effect) = self.machine.apply(event) else {
            return;
        };

        let sock_id = self.transport.connection_id().to_owned();
        let emitted = match effect {
            HandshakeEffect::StopTimer => Ok(()),
            HandshakeEffect::Authorize(identity) => {
                tracing::info!(
                    sock_id,
                    uid = identity.as_ref().map(|udo| udo.id.to_string()),
                    "Socket authorized"
                );
                self.transport.emit(SocketEvent::bare(events::AUTHORIZED)).await
            }
            HandshakeEffect::Reject(reason) => {
                tracing::warn!(sock_id, reason = reason.code(), error = %reason, "Socket handshake rejected");
                if reason == HandshakeRejection::ConnectionClosed {
                    Ok(())
                } else {
                    self.transport
                        .emit(SocketEvent::new(
                            events::UNAUTHORIZED,
                            serde_json::json!({ "error": reason.code() }),
                        ))
                        .await
                }
            }
        };

        if let Err(e) = emitted {
            tracing::debug!(sock_id, error = %e, "Could not notify client of handshake result");
        }
    }

    fn finish(self) -> Result<AuthorizedSocket, HandshakeRejection> {
        let connection_id = self.transport.connection_id().to_owned();
        match self.machine.into_state() {
            HandshakeState::Accepted { identity } => {
                Ok(AuthorizedSocket::new(connection_id, identity))
            }
            HandshakeState::Rejected(reason) => Err(reason),
            // Every path above ends in a terminal event.
            HandshakeState::AwaitingResponse | HandshakeState::Verifying => {
                Err(HandshakeRejection::ConnectionClosed)
            }
        }
    }
}
