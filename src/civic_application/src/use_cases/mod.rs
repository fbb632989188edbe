pub mod establish_session;
pub mod login;
pub mod logout;
pub mod session_serializer;
pub mod socket_handshake;
