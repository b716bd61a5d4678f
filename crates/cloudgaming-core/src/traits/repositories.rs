//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation (PostgreSQL or in-memory).

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{Account, Game};
use crate::error::DomainError;
use crate::value_objects::Email;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Account Repository
// ============================================================================

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find account by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Account>>;

    /// Find account by (normalized) email
    async fn find_by_email(&self, email: &Email) -> RepoResult<Option<Account>>;

    /// Check if email is already registered
    async fn email_exists(&self, email: &Email) -> RepoResult<bool>;

    /// Create a new account
    ///
    /// Must fail with `DomainError::EmailAlreadyExists` when the email is
    /// taken, even if a concurrent registration won the race after
    /// `email_exists` returned false.
    async fn create(&self, account: &Account) -> RepoResult<()>;

    /// Check that the backing store is reachable
    async fn ping(&self) -> RepoResult<()>;
}

// ============================================================================
// Game Repository
// ============================================================================

#[async_trait]
pub trait GameRepository: Send + Sync {
    /// List the catalog ordered by title
    async fn list(&self) -> RepoResult<Vec<Game>>;
}
