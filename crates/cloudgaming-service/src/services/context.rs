//! Service context - dependency container for services
//!
//! Holds the repositories, the credential store, and the session token
//! service. Cheap to clone.

use std::fmt;
use std::sync::Arc;

use cloudgaming_common::{CredentialStore, SessionTokenService};
use cloudgaming_core::traits::{AccountRepository, GameRepository};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    account_repo: Arc<dyn AccountRepository>,
    game_repo: Arc<dyn GameRepository>,

    // Credentials and sessions
    credentials: Arc<CredentialStore>,
    tokens: Arc<SessionTokenService>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        account_repo: Arc<dyn AccountRepository>,
        game_repo: Arc<dyn GameRepository>,
        credentials: Arc<CredentialStore>,
        tokens: Arc<SessionTokenService>,
    ) -> Self {
        Self {
            account_repo,
            game_repo,
            credentials,
            tokens,
        }
    }

    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn account_repo(&self) -> &dyn AccountRepository {
        self.account_repo.as_ref()
    }

    pub fn game_repo(&self) -> &dyn GameRepository {
        self.game_repo.as_ref()
    }

    // === Services ===

    /// Shared handle to the credential store, for moving onto blocking threads
    pub fn credentials(&self) -> Arc<CredentialStore> {
        Arc::clone(&self.credentials)
    }

    pub fn tokens(&self) -> &SessionTokenService {
        self.tokens.as_ref()
    }
}

impl fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("credentials", &self.credentials)
            .field("tokens", &self.tokens)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    account_repo: Option<Arc<dyn AccountRepository>>,
    game_repo: Option<Arc<dyn GameRepository>>,
    credentials: Option<Arc<CredentialStore>>,
    tokens: Option<Arc<SessionTokenService>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account_repo(mut self, repo: Arc<dyn AccountRepository>) -> Self {
        self.account_repo = Some(repo);
        self
    }

    pub fn game_repo(mut self, repo: Arc<dyn GameRepository>) -> Self {
        self.game_repo = Some(repo);
        self
    }

    pub fn credentials(mut self, store: CredentialStore) -> Self {
        self.credentials = Some(Arc::new(store));
        self
    }

    pub fn tokens(mut self, service: SessionTokenService) -> Self {
        self.tokens = Some(Arc::new(service));
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.account_repo
                .ok_or_else(|| ServiceError::validation("account_repo is required"))?,
            self.game_repo
                .ok_or_else(|| ServiceError::validation("game_repo is required"))?,
            self.credentials
                .ok_or_else(|| ServiceError::validation("credentials is required"))?,
            self.tokens
                .ok_or_else(|| ServiceError::validation("tokens is required"))?,
        ))
    }
}

impl fmt::Debug for ServiceContextBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceContextBuilder")
            .field("account_repo", &self.account_repo.is_some())
            .field("game_repo", &self.game_repo.is_some())
            .field("credentials", &self.credentials.is_some())
            .field("tokens", &self.tokens.is_some())
            .finish()
    }
}
