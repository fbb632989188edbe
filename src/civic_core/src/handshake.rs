//! State machine for the post-connection socket handshake.
//!
//! `HandshakeMachine::apply` is the only way to change state. It returns the
//! effect the driver must carry out, or `None` when the event arrived too late
//! to matter. Terminal states swallow everything, so a timeout racing a reply
//! can never produce two outcomes.

use thiserror::Error;

use crate::domain::udo::Udo;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandshakeRejection {
    #[error("Challenge timeout")]
    Timeout,
    #[error("Wrong response format")]
    MalformedResponse,
    #[error("Session store error: {0}")]
    StoreError(String),
    #[error("Session token not found")]
    UnknownToken,
    #[error("Connection closed during handshake")]
    ConnectionClosed,
}

impl HandshakeRejection {
    /// Short reason code sent to the client and used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            HandshakeRejection::Timeout => "timeout",
            HandshakeRejection::MalformedResponse => "malformed-response",
            HandshakeRejection::StoreError(_) => "store-error",
            HandshakeRejection::UnknownToken => "unknown-token",
            HandshakeRejection::ConnectionClosed => "connection-closed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeState {
    /// Challenge sent, timer running.
    AwaitingResponse,
    /// Reply received, timer stopped, session lookup in flight.
    Verifying,
    /// Bound to a live session. `None` identity means an anonymous session.
    Accepted { identity: Option<Udo> },
    Rejected(HandshakeRejection),
}

impl HandshakeState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            HandshakeState::Accepted { .. } | HandshakeState::Rejected(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeEvent {
    ReplyReceived,
    TimedOut,
    Closed,
    Resolved(Option<Udo>),
    Failed(HandshakeRejection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeEffect {
    StopTimer,
    Authorize(Option<Udo>),
    Reject(HandshakeRejection),
}

#[derive(Debug)]
pub struct HandshakeMachine {
    state: HandshakeState,
}

impl HandshakeMachine {
    pub fn new() -> Self {
        Self {
            state: HandshakeState::AwaitingResponse,
        }
    }

    pub fn state(&self) -> &HandshakeState {
        &self.state
    }

    pub fn into_state(self) -> HandshakeState {
        self.state
    }

    pub fn apply(&mut self, event: HandshakeEvent) -> Option<HandshakeEffect> {
        use HandshakeEvent as E;
        use HandshakeState as S;

        let (next, effect) = match (&self.state, event) {
            (S::AwaitingResponse, E::ReplyReceived) => (S::Verifying, HandshakeEffect::StopTimer),
            (S::AwaitingResponse, E::TimedOut) => reject(HandshakeRejection::Timeout),
            (S::AwaitingResponse | S::Verifying, E::Closed) => {
                reject(HandshakeRejection::ConnectionClosed)
            }
            (S::AwaitingResponse | S::Verifying, E::Failed(reason)) => reject(reason),
            (S::Verifying, E::Resolved(identity)) => (
                S::Accepted {
                    identity: identity.clone(),
                },
                HandshakeEffect::Authorize(identity),
            ),
            _ => return None,
        };

        self.state = next;
        Some(effect)
    }
}

impl Default for HandshakeMachine {
    fn default() -> Self {
        Self::new()
    }
}

fn reject(reason: HandshakeRejection) -> (HandshakeState, HandshakeEffect) {
    (
        HandshakeState::Rejected(reason.clone()),
        HandshakeEffect::Reject(reason),
    )
}
