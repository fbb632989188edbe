pub mod helpers;
pub mod tracing;
pub mod website_service;

pub use website_service::{ServiceError, WebsiteService, web_config};
