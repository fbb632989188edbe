//! Axum route handlers.
//!
//! Handlers extract what they need with Axum extractors and hand the real
//! work to `civic_application`.

pub mod identity;
pub mod login;
pub mod logout;
pub mod socket;

pub use identity::current_identity;
pub use login::{LoginError, LoginForm, LoginState, login, login_page};
pub use logout::{LogoutResponseError, LogoutState, logout};
pub use socket::{AxumSocket, SocketHandler, SocketHandlers, SocketState, serve_socket, socket};
