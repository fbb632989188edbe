use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use civic_adapters::config::CivicSettings;
use civic_application::{
    EstablishSessionUseCase, LocalAuthenticator, LogoutUseCase, build_guard,
};
use civic_axum::{
    WebConfig, guarded, restore_session,
    routes::{SocketHandlers, current_identity, login, login_page, logout, socket},
};
use civic_core::{
    CredentialStore, GuardConfigError, GuardOptions, LoginObserver, SessionStore,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::tracing::{make_span_with_request_id, on_request, on_response};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid guard configuration: {0}")]
    Guard(#[from] GuardConfigError),
}

/// Website routes: login/logout, guarded pages and the websocket endpoint,
/// all behind the session restore layer.
pub struct WebsiteService {
    router: Router,
}

impl WebsiteService {
    /// # Note on Architecture
    /// Every dependency is built once here and shared by reference. Stores
    /// implement Clone via internal handles for thread-safe sharing.
    pub fn new<C, O, S>(
        credential_store: C,
        login_observer: O,
        session_store: S,
        config: WebConfig,
    ) -> Result<Self, ServiceError>
    where
        C: CredentialStore + 'static,
        O: LoginObserver + 'static,
        S: SessionStore + Clone + 'static,
    {
        let config = Arc::new(config);
        let authenticator = Arc::new(LocalAuthenticator::new(credential_store, login_observer));
        let establish_session = Arc::new(EstablishSessionUseCase::new(session_store.clone()));
        let logout_use_case = Arc::new(LogoutUseCase::new(session_store.clone()));
        let socket_handlers = Arc::new(SocketHandlers::with_builtin()?);

        let dashboard: Router = guarded(
            Router::new().route("/dashboard", get(current_identity)),
            build_guard("dashboard")?.into_http()?,
            config.clone(),
        );
        let users: Router = guarded(
            Router::new().route("/users/{id}", get(current_identity)),
            build_guard(GuardOptions::new("user").own_user())?.into_http()?,
            config.clone(),
        );
        let admin: Router = guarded(
            Router::new().route("/admin", get(current_identity)),
            build_guard(GuardOptions::new("admin").no_access())?.into_http()?,
            config.clone(),
        );

        let router: Router = Router::new()
            // Login needs the authenticator and somewhere to put the session
            .route("/login", post(login::<C, O, S>))
            .with_state((authenticator, establish_session, config.clone()))
            .route("/login", get(login_page))
            .with_state(config.clone())
            .route("/logout", post(logout::<S>))
            .with_state((logout_use_case, config.clone()))
            // The socket authenticates itself through the handshake
            .route("/socket", get(socket::<S>))
            .with_state((session_store.clone(), socket_handlers, config.clone()))
            .merge(dashboard)
            .merge(users)
            .merge(admin)
            .layer(middleware::from_fn_with_state(
                (session_store, config),
                restore_session::<S>,
            ));

        Ok(Self { router })
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// Router to mount inside another application.
    pub fn as_nested_router(self) -> Router {
        self.with_trace_layer().router
    }

    pub async fn run_standalone(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let router = self.as_nested_router();

        tracing::info!("Website listening on {}", listener.local_addr()?);

        axum_server::Server::<std::net::SocketAddr>::from_listener(listener)
            .serve(router.into_make_service())
            .await
    }
}

/// Web settings as the Axum layer wants them.
pub fn web_config(settings: &CivicSettings) -> WebConfig {
    WebConfig {
        session_cookie: settings.session.cookie_name.clone(),
        flash_cookie: settings.session.flash_cookie_name.clone(),
        login_route: settings.auth.login_route.clone(),
        after_login_route: settings.auth.after_login_route.clone(),
        challenge_timeout: settings.websocket.challenge_timeout(),
    }
}
