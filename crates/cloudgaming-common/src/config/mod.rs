//! Configuration structs

mod app_config;

pub use app_config::{
    parse_duration_secs, AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig,
    Environment, JwtConfig, PasswordHashingConfig, ServerConfig,
};
