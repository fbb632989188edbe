//! Access-control policy shared by HTTP routes and socket message handlers.
//!
//! This module only decides. Reacting to a decision (redirects, error
//! replies, logging) belongs to the transport-specific guards built on top.

use std::fmt;

use thiserror::Error;

use crate::domain::udo::Udo;

const DEFAULT_OWN_USER_FIELD: &str = "id";

/// Configuration record for a guard.
///
/// ```ignore
/// let options = GuardOptions::new("doc").own_user();
/// let options: GuardOptions = "dashboard".into();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardOptions {
    /// Label of the protected resource. Only used for audit logs, but required.
    pub resource: String,
    /// Require the acting identity to own the target resource.
    pub own_user: bool,
    /// Field of the acting identity compared against the resource owner id.
    pub own_user_field: String,
    /// Deny everyone, authenticated or not.
    pub no_access: bool,
    /// Build the socket entry point instead of the HTTP one.
    pub socket: bool,
}

impl GuardOptions {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            ..Self::default()
        }
    }

    pub fn own_user(mut self) -> Self {
        self.own_user = true;
        self
    }

    pub fn own_user_field(mut self, field: impl Into<String>) -> Self {
        self.own_user = true;
        self.own_user_field = field.into();
        self
    }

    pub fn no_access(mut self) -> Self {
        self.no_access = true;
        self
    }

    pub fn socket(mut self) -> Self {
        self.socket = true;
        self
    }
}

impl Default for GuardOptions {
    fn default() -> Self {
        Self {
            resource: String::new(),
            own_user: false,
            own_user_field: DEFAULT_OWN_USER_FIELD.to_owned(),
            no_access: false,
            socket: false,
        }
    }
}

/// Shorthand: a bare resource label with every other option at its default.
impl From<&str> for GuardOptions {
    fn from(resource: &str) -> Self {
        Self::new(resource)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuardConfigError {
    #[error("No resource defined for guard")]
    MissingResource,
    #[error("Guard for resource {0} compares ownership on an empty field name")]
    EmptyOwnUserField(String),
    #[error("Guard for resource {resource} was built for {built}, not {requested}")]
    TransportMismatch {
        resource: String,
        built: Transport,
        requested: Transport,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Http,
    Socket,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Transport::Http => "http",
            Transport::Socket => "socket",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NotAuthenticated,
    NoAccessConfigured,
    NotResourceOwner,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::NotAuthenticated => "not-authenticated",
            DenyReason::NoAccessConfigured => "no-access-configured",
            DenyReason::NotResourceOwner => "not-resource-owner",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Validated guard configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardPolicy {
    resource: String,
    own_user_field: Option<String>,
    no_access: bool,
    transport: Transport,
}

impl GuardPolicy {
    pub fn from_options(options: GuardOptions) -> Result<Self, GuardConfigError> {
        let resource = options.resource.trim().to_owned();
        if resource.is_empty() {
            return Err(GuardConfigError::MissingResource);
        }

        let own_user_field = if options.own_user {
            let field = options.own_user_field.trim();
            if field.is_empty() {
                return Err(GuardConfigError::EmptyOwnUserField(resource));
            }
            Some(field.to_owned())
        } else {
            None
        };

        Ok(Self {
            resource,
            own_user_field,
            no_access: options.no_access,
            transport: if options.socket {
                Transport::Socket
            } else {
                Transport::Http
            },
        })
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    pub fn requires_ownership(&self) -> bool {
        self.own_user_field.is_some()
    }

    /// First matching rule wins: authentication, then `no_access`, then ownership.
    pub fn evaluate(&self, identity: Option<&Udo>, resource_owner: Option<&str>) -> Decision {
        let Some(identity) = identity else {
            return Decision::Deny(DenyReason::NotAuthenticated);
        };

        if self.no_access {
            return Decision::Deny(DenyReason::NoAccessConfigured);
        }

        if let Some(field) = &self.own_user_field {
            let acting = identity.field(field);
            match (acting.as_deref(), resource_owner) {
                (Some(acting), Some(owner)) if acting == owner => {}
                _ => return Decision::Deny(DenyReason::NotResourceOwner),
            }
        }

        Decision::Allow
    }
}
