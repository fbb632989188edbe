pub mod guard;
pub mod use_cases;

pub use guard::{Guard, HttpGuard, SocketGuard, build_guard};
pub use use_cases::{
    establish_session::{EstablishSessionError, EstablishSessionUseCase},
    login::{
        AuthErrorKind, AuthenticationError, AuthenticationOutcome, GENERIC_CREDENTIALS_MESSAGE,
        LocalAuthenticator,
    },
    logout::{LogoutError, LogoutUseCase},
    session_serializer::{SessionSerializer, SessionSerializerError},
    socket_handshake::{AuthorizedSocket, SocketHandshake},
};
