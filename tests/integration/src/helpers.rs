//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers and making HTTP requests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use cloudgaming_api::{create_app, AppState};
use cloudgaming_common::{AppConfig, CredentialStore, SessionTokenService};
use cloudgaming_core::AccountStatus;
use cloudgaming_db::{InMemoryAccountRepository, InMemoryGameRepository};
use cloudgaming_service::ServiceContextBuilder;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Signing secret shared by every test server
pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub config: AppConfig,
    accounts: Arc<InMemoryAccountRepository>,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server with the default test configuration
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()?).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let accounts = Arc::new(InMemoryAccountRepository::new());

        let service_context = ServiceContextBuilder::new()
            .account_repo(accounts.clone())
            .game_repo(Arc::new(InMemoryGameRepository::seeded()))
            .credentials(CredentialStore::new(&config.password)?)
            .tokens(SessionTokenService::from_config(&config.jwt)?)
            .build()
            .map_err(|e| anyhow::anyhow!("Service context error: {e}"))?;

        let app = create_app(AppState::new(service_context, config.clone()));

        // Ephemeral port
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            config,
            accounts,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Token service using the server's signing secret and lifetime
    pub fn token_service(&self) -> Result<SessionTokenService> {
        Ok(SessionTokenService::from_config(&self.config.jwt)?)
    }

    /// Change an account's status behind the API's back
    pub fn set_account_status(&self, id: &str, status: AccountStatus) -> Result<()> {
        let id = Uuid::parse_str(id)?;
        self.accounts
            .set_status(id, status)
            .map_err(|e| anyhow::anyhow!("{e}"))
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a GET request with a bearer token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        self.get_with_authorization(path, &format!("Bearer {token}")).await
    }

    /// Make a GET request with a raw Authorization header value
    pub async fn get_with_authorization(&self, path: &str, value: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .get(&url)
            .header("Authorization", value)
            .send()
            .await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Make a POST request with a raw body and JSON content type
    pub async fn post_raw(&self, path: &str, body: &'static str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?)
    }
}

/// Create a test configuration
///
/// Uses cheap hashing parameters and a fixed secret; no environment needed.
pub fn test_config() -> Result<AppConfig> {
    test_config_with(&[])
}

/// Create a test configuration with extra variables layered on top
pub fn test_config_with(overrides: &[(&str, &str)]) -> Result<AppConfig> {
    let mut vars: HashMap<String, String> = [
        ("APP_ENV", "development"),
        ("JWT_SECRET", TEST_JWT_SECRET),
        ("JWT_EXPIRES_IN", "15m"),
        ("DATABASE_URL", "postgres://unused@localhost/unused"),
        ("ARGON2_MEMORY_KIB", "1024"),
        ("ARGON2_ITERATIONS", "1"),
        ("ARGON2_PARALLELISM", "1"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    for (key, value) in overrides {
        vars.insert((*key).to_string(), (*value).to_string());
    }

    AppConfig::from_lookup(|key| vars.get(key).cloned())
        .map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}
