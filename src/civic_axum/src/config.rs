use std::time::Duration;

use crate::adapters::{AxumResponseBuilder, DEFAULT_FLASH_COOKIE, response_builder};

/// Cookie names, redirect targets and timers used by the website routes.
#[derive(Debug, Clone)]
pub struct WebConfig {
    pub session_cookie: String,
    pub flash_cookie: String,
    pub login_route: String,
    pub after_login_route: String,
    pub challenge_timeout: Duration,
}

impl WebConfig {
    /// Response builder that writes flashes into the configured cookie.
    pub fn response_builder(&self) -> AxumResponseBuilder {
        response_builder().with_flash_cookie(self.flash_cookie.clone())
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            session_cookie: "civic.sid".to_owned(),
            flash_cookie: DEFAULT_FLASH_COOKIE.to_owned(),
            login_route: "/login".to_owned(),
            after_login_route: "/dashboard".to_owned(),
            challenge_timeout: Duration::from_secs(5),
        }
    }
}
