//! Route-level authorization with an [`HttpGuard`].
//!
//! ```ignore
//! let guard = build_guard(GuardOptions::new("user").own_user())?.into_http()?;
//! let users = guarded(Router::new().route("/users/{id}", get(show_user)), guard, config);
//! ```

use std::sync::Arc;

use axum::{
    Router,
    extract::{RawPathParams, Request, State},
    middleware::{self, Next},
    response::Response,
};
use civic_application::HttpGuard;

use crate::{adapters::AxumRequest, config::WebConfig};

type GuardState = (Arc<HttpGuard>, Arc<WebConfig>);

pub async fn require_guard(
    State((guard, config)): State<GuardState>,
    params: RawPathParams,
    request: Request,
    next: Next,
) -> Response {
    let request = AxumRequest::new(request).with_params(params.iter());

    match guard.authorize(&request, config.response_builder()) {
        Ok(()) => next.run(request.into_inner()).await,
        Err(denied) => denied,
    }
}

/// Puts `guard` in front of every route already on `router`.
///
/// Applied with `route_layer`, so route parameters are matched by the time
/// the guard runs and unmatched paths still fall through to a 404.
pub fn guarded<S>(router: Router<S>, guard: HttpGuard, config: Arc<WebConfig>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let guard = guard.with_login_route(config.login_route.clone());
    router.route_layer(middleware::from_fn_with_state(
        (Arc::new(guard), config),
        require_guard,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{routes::current_identity, session::restore_session};
    use axum::{
        body::{Body, to_bytes},
        http::{StatusCode, header},
        routing::get,
    };
    use civic_application::{SessionSerializer, build_guard};
    use civic_core::{
        GuardOptions, SessionRole, SessionStore, SessionStoreError, SessionToken, Udo, UserId,
    };
    use std::collections::HashMap;
    use tower::ServiceExt;

    #[derive(Clone, Default)]
    struct MockSessionStore {
        records: Arc<HashMap<String, serde_json::Value>>,
    }

    #[async_trait::async_trait]
    impl SessionStore for MockSessionStore {
        fn role(&self) -> SessionRole {
            SessionRole::Website
        }

        async fn get(
            &self,
            token: &SessionToken,
        ) -> Result<Option<serde_json::Value>, SessionStoreError> {
            Ok(self.records.get(token.as_str()).cloned())
        }

        async fn set(
            &self,
            _token: &SessionToken,
            _record: serde_json::Value,
        ) -> Result<(), SessionStoreError> {
            unimplemented!()
        }

        async fn destroy(&self, _token: &SessionToken) -> Result<(), SessionStoreError> {
            unimplemented!()
        }
    }

    fn jane() -> Udo {
        Udo {
            id: UserId::new(),
            email: "jane@example.com".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            full_name: "Jane Doe".to_string(),
        }
    }

    fn app(identity: &Udo) -> Router {
        let config = Arc::new(WebConfig::default());
        let store = MockSessionStore {
            records: Arc::new(HashMap::from([
                (
                    "tok-jane".to_string(),
                    SessionSerializer.record_for(identity).unwrap(),
                ),
                (
                    "tok-foreign".to_string(),
                    serde_json::json!({ "cookie": { "path": "/" } }),
                ),
            ])),
        };
        let guard = build_guard(GuardOptions::new("user").own_user())
            .unwrap()
            .into_http()
            .unwrap();

        guarded(
            Router::new().route("/users/{id}", get(current_identity)),
            guard,
            config.clone(),
        )
        .layer(middleware::from_fn_with_state(
            (store, config),
            restore_session::<MockSessionStore>,
        ))
    }

    fn get_request(uri: &str, token: Option<&str>) -> axum::http::Request<Body> {
        let mut builder = axum::http::Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("civic.sid={token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_owner_reaches_the_handler() {
        let identity = jane();
        let response = app(&identity)
            .oneshot(get_request(
                &format!("/users/{}", identity.id),
                Some("tok-jane"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let returned: Udo = serde_json::from_slice(&body).unwrap();
        assert_eq!(returned, identity);
    }

    #[tokio::test]
    async fn test_denied_requests_are_redirected_to_login() {
        let identity = jane();
        let other = UserId::new();

        for (uri, token) in [
            (format!("/users/{other}"), Some("tok-jane")),
            (format!("/users/{}", identity.id), None),
            (format!("/users/{}", identity.id), Some("tok-unknown")),
            (format!("/users/{}", identity.id), Some("tok-foreign")),
        ] {
            let response = app(&identity)
                .oneshot(get_request(&uri, token))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
            assert_eq!(response.headers()[header::LOCATION], "/login");
            let flash = response.headers()[header::SET_COOKIE].to_str().unwrap();
            assert!(flash.starts_with("civic.flash=You%20are%20not%20authenticated"));
        }
    }
}
