//! Session restore middleware.
//!
//! Runs before routing-level guards: reads the session cookie, loads the
//! record from the store and puts a [`CurrentSession`] into the request
//! extensions. Requests without a usable cookie continue anonymously.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use civic_application::{SessionSerializer, SessionSerializerError};
use civic_core::{SessionStore, SessionStoreError, SessionToken, Udo};
use thiserror::Error;

use crate::config::WebConfig;

/// The session bound to the current request, if any.
#[derive(Debug, Clone, Default)]
pub struct CurrentSession {
    token: Option<SessionToken>,
    identity: Option<Udo>,
}

impl CurrentSession {
    pub fn new(token: Option<SessionToken>, identity: Option<Udo>) -> Self {
        Self { token, identity }
    }

    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    pub fn identity(&self) -> Option<&Udo> {
        self.identity.as_ref()
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session store error: {0}")]
    Store(#[from] SessionStoreError),
    #[error("Corrupt session record: {0}")]
    Corrupt(#[from] SessionSerializerError),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "Could not restore session");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": "An error occurred, please retry" })),
        )
            .into_response()
    }
}

#[tracing::instrument(name = "Restore session", skip_all)]
pub async fn restore_session<S>(
    State((store, config)): State<(S, Arc<WebConfig>)>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, SessionError>
where
    S: SessionStore + Clone + 'static,
{
    let token = jar
        .get(&config.session_cookie)
        .and_then(|cookie| SessionToken::parse(cookie.value()));

    let session = match token {
        Some(token) => load(&store, token).await?,
        None => CurrentSession::default(),
    };

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

async fn load<S: SessionStore>(
    store: &S,
    token: SessionToken,
) -> Result<CurrentSession, SessionError> {
    let Some(record) = store.get(&token).await? else {
        tracing::debug!("Unknown session token");
        return Ok(CurrentSession::default());
    };

    let identity = match SessionSerializer.restore(record) {
        Ok(identity) => identity,
        // A non-object record never named a session of ours.
        Err(SessionSerializerError::NotAnObject) => return Ok(CurrentSession::default()),
        Err(e) => return Err(e.into()),
    };

    Ok(CurrentSession::new(Some(token), identity))
}
