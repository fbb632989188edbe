//! # Civic - Website Authentication Library
//!
//! Facade crate re-exporting the public APIs of the civic workspace crates:
//! local login, session serialization, authorization guards and the
//! websocket challenge handshake.
//!
//! ## Usage
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! civic = { path = "../civic" }
//! ```
//!
//! ## Structure
//!
//! - **Core domain types**: `Email`, `Password`, `User`, `Udo`, `SessionToken`
//! - **Ports**: `CredentialStore`, `SessionStore`, `LoginObserver`, `SocketTransport`
//! - **Use cases**: `LocalAuthenticator`, `SessionSerializer`, `SocketHandshake`, `build_guard`
//! - **Adapters**: `PostgresCredentialStore`, `RedisSessionStore`, in-memory stores
//! - **Service**: `WebsiteService` - the main entry point

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types, ports and state machines
pub mod core {
    pub use civic_core::*;
}

pub use civic_core::{
    Email, Password, SessionRecord, SessionRole, SessionToken, Udo, User, UserError, UserId,
};

// ============================================================================
// Ports
// ============================================================================

pub use civic_core::{
    CredentialRecord, CredentialStore, CredentialStoreError, LoginObserver, NoopLoginObserver,
    SessionStore, SessionStoreError, SocketEvent, SocketTransport, SocketTransportError,
};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases and guards
pub mod use_cases {
    pub use civic_application::*;
}

pub use civic_application::{
    AuthenticationError, AuthenticationOutcome, AuthorizedSocket, EstablishSessionUseCase, Guard,
    HttpGuard, LocalAuthenticator, LogoutUseCase, SessionSerializer, SocketGuard,
    SocketHandshake, build_guard,
};
pub use civic_core::{Decision, DenyReason, GuardOptions, HandshakeRejection};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Axum integration: request adapters, session layer, guards and routes
    pub mod http {
        pub use civic_axum::*;
    }

    /// Persistence implementations
    pub mod persistence {
        pub use civic_adapters::persistence::*;
    }

    /// Configuration
    pub mod config {
        pub use civic_adapters::config::*;
    }
}

pub use civic_adapters::{
    HashMapCredentialStore, HashMapSessionStore, PostgresCredentialStore, RedisSessionStore,
    TracingLoginObserver,
};

// ============================================================================
// Website Service (Main Entry Point)
// ============================================================================

pub use civic_service::{
    WebsiteService,
    helpers::{configure_postgresql, configure_redis, get_redis_client},
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing the store traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};
