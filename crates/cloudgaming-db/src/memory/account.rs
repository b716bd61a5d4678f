//! In-memory AccountRepository backed by `DashMap`

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use cloudgaming_core::entities::{Account, AccountStatus};
use cloudgaming_core::error::DomainError;
use cloudgaming_core::traits::{AccountRepository, RepoResult};
use cloudgaming_core::value_objects::Email;

/// Accounts keyed by normalized email, with an id index
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    by_email: DashMap<Email, Account>,
    ids: DashMap<Uuid, Email>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts
    pub fn len(&self) -> usize {
        self.by_email.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_email.is_empty()
    }

    /// Change an account's status (administrative action)
    pub fn set_status(&self, id: Uuid, status: AccountStatus) -> RepoResult<()> {
        let email = self
            .ids
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(DomainError::AccountNotFound(id))?;

        let mut account = self
            .by_email
            .get_mut(&email)
            .ok_or(DomainError::AccountNotFound(id))?;
        account.status = status;
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Account>> {
        let Some(email) = self.ids.get(&id).map(|entry| entry.value().clone()) else {
            return Ok(None);
        };
        Ok(self.by_email.get(&email).map(|entry| entry.value().clone()))
    }

    async fn find_by_email(&self, email: &Email) -> RepoResult<Option<Account>> {
        Ok(self.by_email.get(email).map(|entry| entry.value().clone()))
    }

    async fn email_exists(&self, email: &Email) -> RepoResult<bool> {
        Ok(self.by_email.contains_key(email))
    }

    async fn create(&self, account: &Account) -> RepoResult<()> {
        // The shard lock is held across check and insert.
        match self.by_email.entry(account.email.clone()) {
            Entry::Occupied(_) => Err(DomainError::EmailAlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(account.clone());
                self.ids.insert(account.id, account.email.clone());
                debug!(account_id = %account.id, "Account stored in memory");
                Ok(())
            }
        }
    }

    async fn ping(&self) -> RepoResult<()> {
        Ok(())
    }
}
