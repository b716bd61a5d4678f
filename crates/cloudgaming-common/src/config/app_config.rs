//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present). Secrets are required: there is no built-in fallback signing key.

use std::env;
use std::fmt;

use crate::auth::{MAX_TOKEN_TTL_SECS, MIN_SECRET_LEN};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub password: PasswordHashingConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" | "dev" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Apply embedded schema migrations at startup
    pub run_migrations: bool,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("run_migrations", &self.run_migrations)
            .finish()
    }
}

/// Session token configuration
#[derive(Clone)]
pub struct JwtConfig {
    secret: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expires_in: i64) -> Self {
        Self {
            secret: secret.into(),
            expires_in,
        }
    }

    /// Signing secret; never log this
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Argon2id cost parameters for new password digests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordHashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_argon2_memory_kib(),
            iterations: default_argon2_iterations(),
            parallelism: default_argon2_parallelism(),
        }
    }
}

impl PasswordHashingConfig {
    /// Cheapest parameters Argon2 accepts; test suites only
    #[must_use]
    pub fn fast_for_tests() -> Self {
        Self {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }

    /// True if any cost is below the production baseline (19 MiB, t=2, p=1)
    #[must_use]
    pub fn is_below_baseline(&self) -> bool {
        let baseline = Self::default();
        self.memory_kib < baseline.memory_kib
            || self.iterations < baseline.iterations
            || self.parallelism < baseline.parallelism
    }
}

/// CORS configuration
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    /// Allowed origins; empty means any origin
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty()
    }
}

// Default value functions
fn default_app_name() -> String {
    "cloudgaming-api".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_run_migrations() -> bool {
    true
}

fn default_token_expiry() -> i64 {
    900 // 15 minutes
}

fn default_argon2_memory_kib() -> u32 {
    19 * 1024
}

fn default_argon2_iterations() -> u32 {
    2
}

fn default_argon2_parallelism() -> u32 {
    1
}

/// Parse a duration such as `900`, `30s`, `15m`, `2h` or `7d` into seconds
///
/// Returns `None` for anything else, including zero and negative values.
#[must_use]
pub fn parse_duration_secs(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (digits, multiplier) = match raw.char_indices().last()? {
        (i, 's') => (&raw[..i], 1),
        (i, 'm') => (&raw[..i], 60),
        (i, 'h') => (&raw[..i], 3_600),
        (i, 'd') => (&raw[..i], 86_400),
        _ => (raw, 1),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let value: i64 = digits.parse().ok()?;
    let seconds = value.checked_mul(multiplier)?;
    (seconds > 0).then_some(seconds)
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or
    /// a value is out of range
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// # Errors
    /// Same as [`AppConfig::from_env`]
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let env = match var("APP_ENV") {
            Some(raw) => Environment::parse(&raw)
                .ok_or_else(|| ConfigError::InvalidValue("APP_ENV", raw.clone()))?,
            None => default_env(),
        };

        let secret = var("JWT_SECRET").ok_or(ConfigError::MissingVar("JWT_SECRET"))?;
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET",
                format!("must be at least {MIN_SECRET_LEN} bytes"),
            ));
        }

        let expires_in = match var("JWT_EXPIRES_IN") {
            Some(raw) => parse_duration_secs(&raw)
                .ok_or_else(|| ConfigError::InvalidValue("JWT_EXPIRES_IN", raw.clone()))?,
            None => default_token_expiry(),
        };
        if expires_in > MAX_TOKEN_TTL_SECS {
            return Err(ConfigError::InvalidValue(
                "JWT_EXPIRES_IN",
                format!("must be at most {MAX_TOKEN_TTL_SECS} seconds"),
            ));
        }

        let password = PasswordHashingConfig {
            memory_kib: parse_or("ARGON2_MEMORY_KIB", var("ARGON2_MEMORY_KIB"), default_argon2_memory_kib)?,
            iterations: parse_or("ARGON2_ITERATIONS", var("ARGON2_ITERATIONS"), default_argon2_iterations)?,
            parallelism: parse_or("ARGON2_PARALLELISM", var("ARGON2_PARALLELISM"), default_argon2_parallelism)?,
        };
        if env.is_production() && password.is_below_baseline() {
            return Err(ConfigError::InvalidValue(
                "ARGON2_*",
                "password hashing cost is below the production baseline".to_string(),
            ));
        }

        let cors = CorsConfig {
            allowed_origins: var("CORS_ORIGIN")
                .map(|s| {
                    s.split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty() && *o != "*")
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        };
        if env.is_production() && cors.allows_any_origin() {
            return Err(ConfigError::MissingVar("CORS_ORIGIN"));
        }

        Ok(Self {
            app: AppSettings {
                name: var("APP_NAME").unwrap_or_else(default_app_name),
                env,
            },
            api: ServerConfig {
                host: var("API_HOST").unwrap_or_else(default_host),
                port: parse_or("PORT", var("PORT"), default_port)?,
                request_timeout_secs: parse_or(
                    "REQUEST_TIMEOUT_SECS",
                    var("REQUEST_TIMEOUT_SECS"),
                    default_request_timeout,
                )?,
            },
            database: DatabaseConfig {
                url: var("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parse_or(
                    "DATABASE_MAX_CONNECTIONS",
                    var("DATABASE_MAX_CONNECTIONS"),
                    default_max_connections,
                )?,
                min_connections: parse_or(
                    "DATABASE_MIN_CONNECTIONS",
                    var("DATABASE_MIN_CONNECTIONS"),
                    default_min_connections,
                )?,
                run_migrations: parse_or(
                    "DATABASE_RUN_MIGRATIONS",
                    var("DATABASE_RUN_MIGRATIONS"),
                    default_run_migrations,
                )?,
            },
            jwt: JwtConfig {
                secret,
                expires_in,
            },
            password,
            cors,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: fn() -> T,
) -> Result<T, ConfigError> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw.clone())),
        None => Ok(default()),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
