pub mod env {
    pub const ENV_PREFIX: &str = "CIVIC";
    pub const ENV_SEPARATOR: &str = "__";
}

pub const CONFIG_FILE: &str = "config/default";

pub mod defaults {
    pub const APP_ADDRESS: &str = "0.0.0.0:3000";
    pub const SESSION_COOKIE_NAME: &str = "civic.sid";
    pub const FLASH_COOKIE_NAME: &str = "civic.flash";
    pub const SESSION_TTL_SECONDS: u64 = 60 * 60 * 24;
    pub const LOGIN_ROUTE: &str = "/login";
    pub const AFTER_LOGIN_ROUTE: &str = "/dashboard";
    pub const CHALLENGE_TIMEOUT_MS: u64 = 5000;
    pub const REDIS_HOST_NAME: &str = "127.0.0.1";
}

pub mod test {
    pub const APP_ADDRESS: &str = "127.0.0.1:0";
    pub const CHALLENGE_TIMEOUT_MS: u64 = 500;
}
