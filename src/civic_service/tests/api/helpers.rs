use std::time::Duration;

use civic_adapters::{
    HashMapCredentialStore, HashMapSessionStore, TracingLoginObserver, config::constants::test,
};
use civic_axum::WebConfig;
use civic_core::{Email, Password, SessionRole, Udo, User, UserId};
use civic_service::WebsiteService;
use secrecy::Secret;

pub const PASSWORD: &str = "correct horse battery staple";

pub struct TestApp {
    pub address: String,
    pub socket_address: String,
    pub http_client: reqwest::Client,
    pub credential_store: HashMapCredentialStore,
    pub session_store: HashMapSessionStore,
}

impl TestApp {
    pub async fn new() -> Self {
        let credential_store = HashMapCredentialStore::new();
        let session_store = HashMapSessionStore::new(SessionRole::Website);
        let config = WebConfig {
            challenge_timeout: Duration::from_millis(test::CHALLENGE_TIMEOUT_MS),
            ..WebConfig::default()
        };

        let service = WebsiteService::new(
            credential_store.clone(),
            TracingLoginObserver,
            session_store.clone(),
            config,
        )
        .expect("Failed to build website service");

        let listener = tokio::net::TcpListener::bind(test::APP_ADDRESS)
            .await
            .expect("Failed to bind test listener");
        let local_addr = listener.local_addr().expect("Failed to read local address");

        tokio::spawn(service.run_standalone(listener));

        let http_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .cookie_store(true)
            .build()
            .expect("Failed to build http client");

        Self {
            address: format!("http://{local_addr}"),
            socket_address: format!("ws://{local_addr}/socket"),
            http_client,
            credential_store,
            session_store,
        }
    }

    pub async fn add_user(&self, email: &str, first_name: &str, last_name: &str) -> Udo {
        let user = User::new(
            UserId::new(),
            Email::parse(email).unwrap(),
            first_name.to_string(),
            last_name.to_string(),
        );
        self.credential_store
            .add_user(
                user.clone(),
                Password::parse(Secret::new(PASSWORD.to_string())).unwrap(),
            )
            .await
            .unwrap();
        Udo::from(&user)
    }

    pub async fn post_login(&self, email: &str, password: &str) -> reqwest::Response {
        self.http_client
            .post(format!("{}/login", &self.address))
            .form(&[("email", email), ("password", password)])
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_logout(&self) -> reqwest::Response {
        self.http_client
            .post(format!("{}/logout", &self.address))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.http_client
            .get(format!("{}{}", &self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Logs in as a fresh user and returns it with its session token.
    pub async fn logged_in_user(&self) -> (Udo, String) {
        let udo = self.add_user("jane@example.com", "Jane", "Doe").await;
        let response = self.post_login("jane@example.com", PASSWORD).await;
        let token = session_token(&response).expect("No session cookie on login");
        (udo, token)
    }
}

pub fn session_token(response: &reqwest::Response) -> Option<String> {
    response
        .cookies()
        .find(|cookie| cookie.name() == "civic.sid")
        .map(|cookie| cookie.value().to_string())
}

pub fn location(response: &reqwest::Response) -> Option<&str> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok())
}
