//! Authentication service
//!
//! Handles registration, login, and authentication of presented session
//! tokens. Password hashing and verification run on the blocking pool.

use chrono::{DateTime, Utc};
use cloudgaming_common::{validate_password_strength, AppError, SessionClaims, TokenError};
use cloudgaming_core::entities::Account;
use cloudgaming_core::value_objects::{Email, PasswordDigest};
use cloudgaming_core::DomainError;
use tokio::task;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::dto::{AuthResponse, LoginRequest, MeResponse, RegisterRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new account and start a session for it
    ///
    /// # Errors
    /// - Validation errors for a malformed email or a weak password
    /// - `DomainError::EmailAlreadyExists` if the email is taken
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        let email = Email::parse(&request.email)?;
        validate_password_strength(&request.password)?;

        if self.ctx.account_repo().email_exists(&email).await? {
            info!("Registration rejected: email already registered");
            return Err(DomainError::EmailAlreadyExists.into());
        }

        let digest = self.hash_password(request.password).await?;
        let account = Account::new(email, digest);

        // A concurrent registration can still win here; the repository
        // reports it as EmailAlreadyExists.
        self.ctx.account_repo().create(&account).await?;

        info!(account_id = %account.id, "Account registered");

        let issued = self
            .ctx
            .tokens()
            .issue(&account.id.to_string(), account.email.as_str())?;

        Ok(AuthResponse::new(&account, issued))
    }

    /// Log in with email and password
    ///
    /// Unknown email and wrong password fail identically, after the same
    /// amount of hashing work. Account status is only disclosed to callers
    /// holding the correct password.
    ///
    /// # Errors
    /// - `AppError::InvalidCredentials` for an unknown email or wrong password
    /// - `AppError::AccountInactive` if the account is not active
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let email = Email::parse(&request.email)?;
        let account = self.ctx.account_repo().find_by_email(&email).await?;

        let Some(account) = account else {
            self.verify_decoy(request.password).await?;
            warn!("Login failed: invalid credentials");
            return Err(ServiceError::invalid_credentials());
        };

        let matches = self
            .verify_password(request.password, account.password_hash.clone())
            .await?;

        if !matches {
            warn!(account_id = %account.id, "Login failed: invalid credentials");
            return Err(ServiceError::invalid_credentials());
        }

        if !account.is_active() {
            warn!(account_id = %account.id, status = %account.status, "Login refused: account not active");
            return Err(AppError::AccountInactive.into());
        }

        info!(account_id = %account.id, "Account logged in");

        let issued = self
            .ctx
            .tokens()
            .issue(&account.id.to_string(), account.email.as_str())?;

        Ok(AuthResponse::new(&account, issued))
    }

    /// Authenticate a presented bearer token against the current time
    ///
    /// # Errors
    /// `AppError::Unauthorized` carrying the rejection reason
    pub fn authenticate(&self, token: Option<&str>) -> ServiceResult<SessionClaims> {
        self.authenticate_at(token, Utc::now())
    }

    /// Authenticate a presented bearer token as of `now`
    ///
    /// `None` means no credential was presented at all.
    ///
    /// # Errors
    /// `AppError::Unauthorized` carrying the rejection reason
    pub fn authenticate_at(
        &self,
        token: Option<&str>,
        now: DateTime<Utc>,
    ) -> ServiceResult<SessionClaims> {
        let result = match token {
            Some(token) => self.ctx.tokens().validate_at(token, now),
            None => Err(TokenError::Missing),
        };

        result.map_err(|reason| {
            warn!(reason = reason.reason(), "Session token rejected");
            ServiceError::unauthorized(reason)
        })
    }

    /// Load the account a validated session belongs to
    ///
    /// # Errors
    /// - `AppError::Unauthorized` if the subject is not an account id
    /// - `ServiceError::NotFound` if the account no longer exists
    #[instrument(skip(self, claims), fields(account_id = %claims.sub))]
    pub async fn current_account(&self, claims: &SessionClaims) -> ServiceResult<MeResponse> {
        let account_id = Uuid::parse_str(&claims.sub).map_err(|_| {
            warn!("Session subject is not an account id");
            ServiceError::unauthorized(TokenError::Malformed)
        })?;

        let account = self
            .ctx
            .account_repo()
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Account", account_id.to_string()))?;

        Ok(MeResponse::from(&account))
    }

    // === Blocking credential work ===

    async fn hash_password(&self, password: String) -> ServiceResult<PasswordDigest> {
        let store = self.ctx.credentials();
        task::spawn_blocking(move || store.hash(&password))
            .await
            .map_err(|e| ServiceError::internal(format!("Password hashing task failed: {e}")))?
            .map_err(ServiceError::from)
    }

    async fn verify_password(&self, password: String, digest: PasswordDigest) -> ServiceResult<bool> {
        let store = self.ctx.credentials();
        task::spawn_blocking(move || store.verify(&password, &digest))
            .await
            .map_err(|e| ServiceError::internal(format!("Password verification task failed: {e}")))
    }

    async fn verify_decoy(&self, password: String) -> ServiceResult<()> {
        let store = self.ctx.credentials();
        task::spawn_blocking(move || store.verify_decoy(&password))
            .await
            .map_err(|e| ServiceError::internal(format!("Password verification task failed: {e}")))
    }
}
