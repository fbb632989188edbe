//! Axum adapters for the HTTP abstraction in `civic_core`.
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │  civic_core::AuthRequest (trait)           │
//! └────────────────┬───────────────────────────┘
//!                  │
//!                  ▼
//! ┌────────────────────────────────────────────┐
//! │  AxumRequest { request, route params }     │
//! │  impl AuthRequest for AxumRequest { }      │
//! └────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use axum::body::Body;
use axum::extract::Request;
use axum::http::{Response, StatusCode};
use axum_extra::extract::cookie::{Cookie, SameSite};
use civic_core::{AuthRequest, AuthResponseBuilder, Udo};

use crate::session::CurrentSession;

pub const DEFAULT_FLASH_COOKIE: &str = "civic.flash";

/// Axum request plus the route parameters matched for it.
///
/// The identity is read from the [`CurrentSession`] extension put there by
/// the session layer.
pub struct AxumRequest {
    request: Request,
    params: HashMap<String, String>,
}

impl AxumRequest {
    pub fn new(request: Request) -> Self {
        Self {
            request,
            params: HashMap::new(),
        }
    }

    pub fn with_params<'a>(mut self, params: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        self.params.extend(
            params
                .into_iter()
                .map(|(name, value)| (name.to_owned(), value.to_owned())),
        );
        self
    }

    pub fn into_inner(self) -> Request {
        self.request
    }
}

impl From<Request> for AxumRequest {
    fn from(req: Request) -> Self {
        AxumRequest::new(req)
    }
}

impl From<AxumRequest> for Request {
    fn from(wrapper: AxumRequest) -> Self {
        wrapper.request
    }
}

impl AuthRequest for AxumRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.request.headers().get(name)?.to_str().ok()
    }

    fn cookie(&self, name: &str) -> Option<&str> {
        self.request
            .headers()
            .get_all("cookie")
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|header| header.split(';'))
            .find_map(|pair| {
                let (key, value) = pair.trim().split_once('=')?;
                (key == name).then_some(value)
            })
    }

    fn method(&self) -> &str {
        self.request.method().as_str()
    }

    fn path(&self) -> &str {
        self.request.uri().path()
    }

    fn identity(&self) -> Option<&Udo> {
        self.request
            .extensions()
            .get::<CurrentSession>()
            .and_then(CurrentSession::identity)
    }

    fn route_param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

pub struct AxumResponseBuilder {
    builder: axum::http::response::Builder,
    body: Option<String>,
    flash_cookie: String,
}

impl AxumResponseBuilder {
    pub fn new() -> Self {
        Self {
            builder: Response::builder(),
            body: None,
            flash_cookie: DEFAULT_FLASH_COOKIE.to_owned(),
        }
    }

    /// Name of the cookie carrying flash messages.
    pub fn with_flash_cookie(mut self, name: impl Into<String>) -> Self {
        self.flash_cookie = name.into();
        self
    }
}

impl Default for AxumResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthResponseBuilder for AxumResponseBuilder {
    type Response = Response<Body>;

    fn status(mut self, code: u16) -> Self {
        self.builder = self.builder.status(code);
        self
    }

    fn header(mut self, name: &str, value: &str) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    fn flash(self, message: &str) -> Self {
        let cookie = Cookie::build((self.flash_cookie.clone(), message.to_owned()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build();
        let value = cookie.encoded().to_string();
        self.cookie(&value)
    }

    fn json_body(mut self, body: serde_json::Value) -> Self {
        self.builder = self.builder.header("content-type", "application/json");
        self.body = Some(body.to_string());
        self
    }

    fn build(self) -> Self::Response {
        let body = self.body.unwrap_or_default();
        self.builder.body(Body::from(body)).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to build response");
            let mut response = Response::new(Body::empty());
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        })
    }
}

pub fn response_builder() -> AxumResponseBuilder {
    AxumResponseBuilder::new()
}
