//! Account entity <-> model mapper

use cloudgaming_core::entities::{Account, AccountStatus};
use cloudgaming_core::error::DomainError;
use cloudgaming_core::value_objects::{Email, PasswordDigest};
use uuid::Uuid;

use crate::models::AccountModel;

/// Convert AccountModel to Account entity
impl TryFrom<AccountModel> for Account {
    type Error = DomainError;

    fn try_from(model: AccountModel) -> Result<Self, Self::Error> {
        let email = Email::parse(&model.email).map_err(|_| {
            DomainError::DatabaseError(format!("account {} has an invalid stored email", model.id))
        })?;
        let status = model
            .status
            .parse::<AccountStatus>()
            .map_err(DomainError::DatabaseError)?;

        Ok(Account {
            id: model.id,
            email,
            password_hash: PasswordDigest::new(model.password_hash),
            status,
            created_at: model.created_at,
        })
    }
}

/// Account values prepared for insertion
pub struct AccountInsert<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub status: &'static str,
}

impl<'a> AccountInsert<'a> {
    pub fn new(account: &'a Account) -> Self {
        Self {
            id: account.id,
            email: account.email.as_str(),
            password_hash: account.password_hash.expose(),
            status: account.status.as_str(),
        }
    }
}
