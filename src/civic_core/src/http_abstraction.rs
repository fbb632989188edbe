//! Zero-cost HTTP abstraction traits.
//!
//! Web frameworks implement these on newtype wrappers of their own request and
//! response types, so guards and login handling stay framework-agnostic.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  civic_core: HTTP traits                 │
//! └──────────────┬───────────────────────────┘
//!                │
//!                ▼
//! ┌──────────────────────────────────────────┐
//! │  civic_axum: newtype wrappers            │
//! │  impl AuthRequest for AxumRequest { }    │
//! └──────────────────────────────────────────┘
//! ```

use crate::domain::udo::Udo;

/// Trait for HTTP requests as seen by authentication and authorization code.
pub trait AuthRequest {
    /// Get a header value by name. Lookup is case-insensitive.
    fn header(&self, name: &str) -> Option<&str>;

    /// Get a cookie value by name.
    fn cookie(&self, name: &str) -> Option<&str>;

    fn method(&self) -> &str;

    fn path(&self) -> &str;

    /// The identity restored from the session, if any.
    ///
    /// Populated by the session layer before any guard runs.
    fn identity(&self) -> Option<&Udo>;

    /// A matched route parameter, e.g. `id` for `/users/{id}`.
    fn route_param(&self, name: &str) -> Option<&str>;
}

/// Trait for building HTTP responses.
///
/// Builder style, so calls chain:
/// ```ignore
/// builder
///     .flash("You are not authenticated")
///     .redirect("/login")
///     .build()
/// ```
pub trait AuthResponseBuilder: Sized {
    /// The final response type produced by this builder
    type Response;

    fn status(self, code: u16) -> Self;

    fn header(self, name: &str, value: &str) -> Self;

    /// Add a Set-Cookie header. `cookie_value` is a complete cookie string.
    fn cookie(self, cookie_value: &str) -> Self {
        self.header("set-cookie", cookie_value)
    }

    /// Attach a one-shot message for the next page view.
    fn flash(self, message: &str) -> Self;

    /// Set a JSON body with Content-Type header
    fn json_body(self, body: serde_json::Value) -> Self;

    /// Build the final response
    fn build(self) -> Self::Response;

    /// 303 See Other to `location`.
    fn redirect(self, location: &str) -> Self {
        self.status(303).header("location", location)
    }
}

/// Convenience responses, implemented for every `AuthResponseBuilder`.
pub trait AuthResponseHelpers: AuthResponseBuilder {
    /// Create a 200 OK JSON response
    fn ok_json(self, body: serde_json::Value) -> Self::Response {
        self.status(200).json_body(body).build()
    }

    /// Create a 401 Unauthorized response
    fn unauthorized(self, message: &str) -> Self::Response {
        self.status(401)
            .json_body(serde_json::json!({ "error": message }))
            .build()
    }

    /// Create a 500 Internal Server Error response
    fn internal_error(self, message: &str) -> Self::Response {
        self.status(500)
            .json_body(serde_json::json!({ "error": message }))
            .build()
    }

    /// Flash `message` and send the client to `location`.
    fn redirect_with_flash(self, location: &str, message: &str) -> Self::Response {
        self.flash(message).redirect(location).build()
    }
}

impl<T: AuthResponseBuilder> AuthResponseHelpers for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MockRequest {
        headers: HashMap<String, String>,
        params: HashMap<String, String>,
        identity: Option<Udo>,
    }

    impl AuthRequest for MockRequest {
        fn header(&self, name: &str) -> Option<&str> {
            let name_lower = name.to_lowercase();
            self.headers
                .iter()
                .find(|(k, _)| k.to_lowercase() == name_lower)
                .map(|(_, v)| v.as_str())
        }

        fn cookie(&self, _name: &str) -> Option<&str> {
            None
        }

        fn method(&self) -> &str {
            "GET"
        }

        fn path(&self) -> &str {
            "/users/42"
        }

        fn identity(&self) -> Option<&Udo> {
            self.identity.as_ref()
        }

        fn route_param(&self, name: &str) -> Option<&str> {
            self.params.get(name).map(String::as_str)
        }
    }

    #[derive(Default)]
    struct RecordingBuilder {
        status: u16,
        headers: Vec<(String, String)>,
        flashes: Vec<String>,
    }

    impl AuthResponseBuilder for RecordingBuilder {
        type Response = Self;

        fn status(mut self, code: u16) -> Self {
            self.status = code;
            self
        }

        fn header(mut self, name: &str, value: &str) -> Self {
            self.headers.push((name.to_string(), value.to_string()));
            self
        }

        fn flash(mut self, message: &str) -> Self {
            self.flashes.push(message.to_string());
            self
        }

        fn json_body(self, _body: serde_json::Value) -> Self {
            self
        }

        fn build(self) -> Self::Response {
            self
        }
    }

    #[test]
    fn test_auth_request_trait() {
        let req = MockRequest {
            headers: HashMap::from([("Content-Type".to_string(), "text/html".to_string())]),
            params: HashMap::from([("id".to_string(), "42".to_string())]),
            identity: None,
        };

        assert_eq!(req.header("content-type"), Some("text/html"));
        assert_eq!(req.route_param("id"), Some("42"));
        assert_eq!(req.route_param("slug"), None);
        assert!(req.identity().is_none());
    }

    #[test]
    fn redirect_with_flash_sets_location_and_message() {
        let resp = RecordingBuilder::default().redirect_with_flash("/login", "Not allowed");

        assert_eq!(resp.status, 303);
        assert_eq!(
            resp.headers,
            vec![("location".to_string(), "/login".to_string())]
        );
        assert_eq!(resp.flashes, vec!["Not allowed".to_string()]);
    }
}
