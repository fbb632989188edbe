use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{CookieJar, cookie::Cookie};
use civic_application::{LogoutError, LogoutUseCase};
use civic_core::SessionStore;

use crate::{config::WebConfig, session::CurrentSession};

pub type LogoutState<S> = (Arc<LogoutUseCase<S>>, Arc<WebConfig>);

#[tracing::instrument(name = "Logout", skip_all)]
pub async fn logout<S>(
    State((logout, config)): State<LogoutState<S>>,
    Extension(session): Extension<CurrentSession>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), LogoutResponseError>
where
    S: SessionStore + 'static,
{
    if let Some(token) = session.token() {
        logout.execute(token).await?;
    }

    let jar = jar.remove(Cookie::build(config.session_cookie.clone()).path("/"));
    Ok((jar, Redirect::to("/")))
}

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct LogoutResponseError(#[from] LogoutError);

impl IntoResponse for LogoutResponseError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self.0, "Logout failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": "An error occurred, please retry" })),
        )
            .into_response()
    }
}
