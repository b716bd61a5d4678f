//! # cloudgaming-common
//!
//! Shared utilities including configuration, error handling, credentials,
//! session tokens, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    validate_password_strength, CredentialStore, IssuedToken, SessionClaims,
    SessionTokenService, TokenError, MAX_TOKEN_TTL_SECS, TOKEN_TYPE,
};
pub use config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment, JwtConfig,
    PasswordHashingConfig, ServerConfig,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
