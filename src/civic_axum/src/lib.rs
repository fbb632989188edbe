//! Axum integration for the civic website.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  civic_core: HTTP and socket traits      │
//! └──────────────┬───────────────────────────┘
//!                │
//!                ▼
//! ┌──────────────────────────────────────────┐
//! │  civic_axum: Axum implementations        │
//! │  - AxumRequest / AxumResponseBuilder     │
//! │  - session restore + guard middleware    │
//! │  - login, logout and websocket routes    │
//! └──────────────────────────────────────────┘
//! ```

pub mod adapters;
pub mod config;
pub mod guard;
pub mod routes;
pub mod session;

pub use adapters::{AxumRequest, AxumResponseBuilder, response_builder};
pub use config::WebConfig;
pub use guard::{guarded, require_guard};
pub use session::{CurrentSession, SessionError, restore_session};
