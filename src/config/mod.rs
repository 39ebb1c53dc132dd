pub mod server;
pub mod session;

pub use server::{ConfigError, ServerConfig};
pub use session::{validate_production_config, SessionConfig, SessionLayer, SESSION_TABLE};

use std::env;

pub fn current_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string())
}

pub fn is_production() -> bool {
    current_environment() == "production"
}

pub(crate) fn env_flag_enabled(key: &str) -> bool {
    env::var(key)
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "True"))
        .unwrap_or(false)
}
