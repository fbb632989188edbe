pub mod authorization;
pub mod domain;
pub mod handshake;
pub mod http_abstraction;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    email::Email,
    password::Password,
    session::{SessionRecord, SessionRole, SessionToken},
    udo::{SessionPayload, Udo},
    user::{User, UserError, UserId},
};

pub use ports::{
    repositories::{
        CredentialRecord, CredentialStore, CredentialStoreError, SessionStore, SessionStoreError,
    },
    services::{LoginObserver, NoopLoginObserver},
    socket::{SocketEvent, SocketTransport, SocketTransportError},
};

pub use authorization::{
    Decision, DenyReason, GuardConfigError, GuardOptions, GuardPolicy, Transport,
};

pub use handshake::{
    HandshakeEffect, HandshakeEvent, HandshakeMachine, HandshakeRejection, HandshakeState,
};

pub use http_abstraction::{AuthRequest, AuthResponseBuilder, AuthResponseHelpers};
