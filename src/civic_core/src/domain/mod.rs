pub mod email;
pub mod password;
pub mod session;
pub mod udo;
pub mod user;
