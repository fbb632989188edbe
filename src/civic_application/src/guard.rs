//! Transport-specific authorization guards.
//!
//! [`build_guard`] validates a [`GuardOptions`] once at startup and returns
//! either an HTTP or a socket entry point. Both run the same
//! [`GuardPolicy`]; they only differ in where the resource owner comes from
//! and in how a denial is delivered.

use civic_core::{
    AuthRequest, AuthResponseBuilder, AuthResponseHelpers, Decision, DenyReason, GuardConfigError,
    GuardOptions, GuardPolicy, Transport, Udo,
};

use crate::use_cases::{login::AuthenticationError, socket_handshake::AuthorizedSocket};

const DEFAULT_LOGIN_ROUTE: &str = "/login";
const OWNER_ROUTE_PARAM: &str = "id";

/// The entry point selected by `GuardOptions::socket`.
#[derive(Debug, Clone)]
pub enum Guard {
    Http(HttpGuard),
    Socket(SocketGuard),
}

impl Guard {
    pub fn policy(&self) -> &GuardPolicy {
        match self {
            Guard::Http(guard) => &guard.policy,
            Guard::Socket(guard) => &guard.policy,
        }
    }

    pub fn into_http(self) -> Result<HttpGuard, GuardConfigError> {
        match self {
            Guard::Http(guard) => Ok(guard),
            Guard::Socket(guard) => Err(mismatch(&guard.policy, Transport::Http)),
        }
    }

    pub fn into_socket(self) -> Result<SocketGuard, GuardConfigError> {
        match self {
            Guard::Socket(guard) => Ok(guard),
            Guard::Http(guard) => Err(mismatch(&guard.policy, Transport::Socket)),
        }
    }
}

fn mismatch(policy: &GuardPolicy, requested: Transport) -> GuardConfigError {
    GuardConfigError::TransportMismatch {
        resource: policy.resource().to_owned(),
        built: policy.transport(),
        requested,
    }
}

/// Builds a guard, failing fast on invalid configuration.
///
/// # Errors
/// [`GuardConfigError::MissingResource`] when no resource label was given.
pub fn build_guard(options: impl Into<GuardOptions>) -> Result<Guard, GuardConfigError> {
    let policy = GuardPolicy::from_options(options.into())?;

    Ok(match policy.transport() {
        Transport::Http => Guard::Http(HttpGuard {
            policy,
            login_route: DEFAULT_LOGIN_ROUTE.to_owned(),
        }),
        Transport::Socket => Guard::Socket(SocketGuard { policy }),
    })
}

#[derive(Debug, Clone)]
pub struct HttpGuard {
    policy: GuardPolicy,
    login_route: String,
}

impl HttpGuard {
    /// Where denied requests are redirected. Defaults to `/login`.
    pub fn with_login_route(mut self, route: impl Into<String>) -> Self {
        self.login_route = route.into();
        self
    }

    pub fn policy(&self) -> &GuardPolicy {
        &self.policy
    }

    /// `Ok(())` lets the request through. On deny, returns the redirect
    /// response (flash message included) to send instead of the handler's.
    pub fn authorize<R, B>(&self, request: &R, builder: B) -> Result<(), B::Response>
    where
        R: AuthRequest,
        B: AuthResponseBuilder,
    {
        let identity = request.identity();
        let owner = request.route_param(OWNER_ROUTE_PARAM);

        match self.policy.evaluate(identity, owner) {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => {
                log_deny(&self.policy, reason, identity, None);
                Err(builder.redirect_with_flash(
                    &self.login_route,
                    AuthenticationError::session().message(),
                ))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SocketGuard {
    policy: GuardPolicy,
}

impl SocketGuard {
    pub fn policy(&self) -> &GuardPolicy {
        &self.policy
    }

    /// Decides for one inbound message on an authorized socket.
    ///
    /// Sockets have no route parameters, so ownership is checked against the
    /// connection's own identity id. On deny `respond` receives the error to
    /// send back and the message must not be handled.
    pub fn authorize<F>(&self, socket: &AuthorizedSocket, respond: F) -> Decision
    where
        F: FnOnce(AuthenticationError),
    {
        let identity = socket.identity();
        let owner = identity.map(|udo| udo.id.to_string());

        let decision = self.policy.evaluate(identity, owner.as_deref());
        if let Decision::Deny(reason) = decision {
            log_deny(&self.policy, reason, identity, Some(socket.connection_id()));
            respond(AuthenticationError::socket());
        }
        decision
    }
}

fn log_deny(
    policy: &GuardPolicy,
    reason: DenyReason,
    identity: Option<&Udo>,
    sock_id: Option<&str>,
) {
    tracing::warn!(
        resource = policy.resource(),
        transport = %policy.transport(),
        reason = %reason,
        uid = identity.map(|udo| udo.id.to_string()),
        email = identity.map(|udo| udo.email.as_str()),
        sock_id,
        "Access denied"
    );
}
