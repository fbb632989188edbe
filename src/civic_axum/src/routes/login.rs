//! Form login with local credentials.

use std::sync::Arc;

use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use civic_application::{
    AuthenticationOutcome, EstablishSessionError, EstablishSessionUseCase, LocalAuthenticator,
};
use civic_core::{
    AuthResponseBuilder, AuthResponseHelpers, CredentialStore, CredentialStoreError,
    LoginObserver, SessionStore,
};
use secrecy::Secret;
use serde::Deserialize;
use thiserror::Error;

use crate::config::WebConfig;

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: Secret<String>,
}

pub type LoginState<C, O, S> = (
    Arc<LocalAuthenticator<C, O>>,
    Arc<EstablishSessionUseCase<S>>,
    Arc<WebConfig>,
);

#[tracing::instrument(name = "Login", skip_all)]
pub async fn login<C, O, S>(
    State((authenticator, establish_session, config)): State<LoginState<C, O, S>>,
    Form(form): Form<LoginForm>,
) -> Result<Response, LoginError>
where
    C: CredentialStore + 'static,
    O: LoginObserver + 'static,
    S: SessionStore + 'static,
{
    let builder = config.response_builder();

    match authenticator
        .authenticate_form(&form.email, form.password)
        .await
    {
        AuthenticationOutcome::Success(udo) => {
            let token = establish_session.execute(&udo).await?;
            let cookie = Cookie::build((config.session_cookie.clone(), token.as_str().to_owned()))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .build();

            Ok(builder
                .cookie(&cookie.to_string())
                .redirect(&config.after_login_route)
                .build())
        }
        AuthenticationOutcome::Rejected(err) => {
            tracing::warn!(kind = ?err.kind(), "Login rejected");
            Ok(builder.redirect_with_flash(&config.login_route, err.message()))
        }
        AuthenticationOutcome::TransportError(e) => Err(LoginError::Transport(e)),
    }
}

/// Hands out and clears the pending flash message, if any.
pub async fn login_page(
    State(config): State<Arc<WebConfig>>,
    jar: CookieJar,
) -> (CookieJar, Json<serde_json::Value>) {
    let flash = jar
        .get(&config.flash_cookie)
        .map(|cookie| cookie.value().to_owned());

    let jar = jar.remove(Cookie::build(config.flash_cookie.clone()).path("/"));
    (jar, Json(serde_json::json!({ "error": flash })))
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Credential store error: {0}")]
    Transport(#[from] CredentialStoreError),
    #[error("Could not establish session: {0}")]
    Session(#[from] EstablishSessionError),
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "Login failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": "An error occurred, please retry" })),
        )
            .into_response()
    }
}
