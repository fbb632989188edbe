use axum::{
    Extension, Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::session::CurrentSession;

/// The acting identity as JSON. Mounted behind a guard; the 401 branch only
/// fires if someone forgets to put one in front.
pub async fn current_identity(Extension(session): Extension<CurrentSession>) -> Response {
    match session.identity() {
        Some(udo) => Json(udo.clone()).into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "You are not authenticated" })),
        )
            .into_response(),
    }
}
