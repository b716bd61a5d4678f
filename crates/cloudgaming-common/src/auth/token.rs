//! Session token issuing and validation
//!
//! Tokens are compact HS256 JWTs (`header.payload.signature`). Validation
//! checks the signature over the raw `header.payload` bytes before anything
//! inside the token is parsed, so an altered byte anywhere is reported as a
//! signature failure rather than whatever the altered claims happen to say.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    crypto, decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::JwtConfig;
use crate::error::AppError;

/// Scheme name clients send in the `Authorization` header
pub const TOKEN_TYPE: &str = "Bearer";

/// Minimum signing secret length in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// Longest accepted token lifetime (30 days)
pub const MAX_TOKEN_TTL_SECS: i64 = 30 * 86_400;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Why a presented token was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("No session token was presented")]
    Missing,

    #[error("Session token is malformed")]
    Malformed,

    #[error("Session token signature is invalid")]
    SignatureInvalid,

    #[error("Session token has expired")]
    Expired,
}

impl TokenError {
    /// Short machine-readable reason, for logs
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Malformed => "malformed",
            Self::SignatureInvalid => "signature_invalid",
            Self::Expired => "expired",
        }
    }
}

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Account ID
    pub sub: String,
    /// Account email at issue time
    pub email: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expires at (unix seconds)
    pub exp: i64,
}

impl SessionClaims {
    /// Build claims for `subject` valid for `ttl` starting at `issued_at`
    ///
    /// # Errors
    /// Returns `AppError::Validation` if the subject is empty, or
    /// `AppError::Internal` if the expiry does not fit in a timestamp.
    pub fn new(
        subject: impl Into<String>,
        email: impl Into<String>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, AppError> {
        let sub = subject.into();
        if sub.trim().is_empty() {
            return Err(AppError::Validation(
                "Token subject must not be empty".to_string(),
            ));
        }

        let iat = issued_at.timestamp();
        let exp = iat
            .checked_add(ttl.num_seconds())
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Session token expiry overflows")))?;

        Ok(Self {
            sub,
            email: email.into(),
            iat,
            exp,
        })
    }

    /// Expiry as a timestamp, `None` if `exp` is out of range
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// A token is expired from the exact second `exp` onwards
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// A freshly issued session token
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub token_type: String,
    /// Lifetime in seconds
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
    #[serde(skip)]
    pub claims: SessionClaims,
}

/// Issues and validates signed session tokens
///
/// Holds no per-session state: a token stays valid until it expires.
#[derive(Clone)]
pub struct SessionTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl SessionTokenService {
    /// Create a token service from a signing secret and token lifetime
    ///
    /// # Errors
    /// Returns `AppError::Config` if the secret is shorter than
    /// `MIN_SECRET_LEN` bytes or the lifetime is not in
    /// `1..=MAX_TOKEN_TTL_SECS` seconds.
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, AppError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AppError::Config(format!(
                "Signing secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }

        if ttl <= Duration::zero() {
            return Err(AppError::Config(
                "Token lifetime must be positive".to_string(),
            ));
        }

        if ttl > Duration::seconds(MAX_TOKEN_TTL_SECS) {
            return Err(AppError::Config(format!(
                "Token lifetime must be at most {MAX_TOKEN_TTL_SECS} seconds"
            )));
        }

        // Expiry is checked by hand against the caller's clock.
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    /// Create a token service from the JWT configuration section
    ///
    /// # Errors
    /// See [`SessionTokenService::new`].
    pub fn from_config(config: &JwtConfig) -> Result<Self, AppError> {
        let ttl = Duration::try_seconds(config.expires_in).ok_or_else(|| {
            AppError::Config(format!(
                "Token lifetime of {} seconds is out of range",
                config.expires_in
            ))
        })?;
        Self::new(config.secret(), ttl)
    }

    /// Configured token lifetime
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `subject` starting now
    ///
    /// # Errors
    /// Returns an error if the subject is empty or encoding fails.
    pub fn issue(&self, subject: &str, email: &str) -> Result<IssuedToken, AppError> {
        self.issue_at(subject, email, Utc::now())
    }

    /// Issue a token for `subject` as if the current time were `now`
    ///
    /// # Errors
    /// Returns an error if the subject is empty or encoding fails.
    pub fn issue_at(
        &self,
        subject: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AppError> {
        let claims = SessionClaims::new(subject, email, now, self.ttl)?;
        let expires_at = claims
            .expires_at()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Session token expiry is out of range")))?;

        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode session token: {e}")))?;

        Ok(IssuedToken {
            token,
            token_type: TOKEN_TYPE.to_string(),
            expires_in: self.ttl.num_seconds(),
            expires_at,
            claims,
        })
    }

    /// Validate a token against the current time
    ///
    /// # Errors
    /// See [`SessionTokenService::validate_at`].
    pub fn validate(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token as if the current time were `now`
    ///
    /// Checks run in order: shape, signature, claims, expiry. The first
    /// failing check decides the error.
    ///
    /// # Errors
    /// - `TokenError::Missing` for an empty token
    /// - `TokenError::Malformed` if it is not a three-segment token or its
    ///   claims cannot be read
    /// - `TokenError::SignatureInvalid` if the signature does not match
    /// - `TokenError::Expired` if `now` is at or past the expiry
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        if token.is_empty() {
            return Err(TokenError::Missing);
        }

        let (message, signature) = split_signed(token)?;

        let signature_ok = crypto::verify(signature, message.as_bytes(), &self.decoding_key, ALGORITHM)
            .map_err(|e| {
                debug!(error = %e, "Session token signature could not be checked");
                TokenError::Malformed
            })?;
        if !signature_ok {
            return Err(TokenError::SignatureInvalid);
        }

        let claims = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Signed session token has unreadable claims");
                TokenError::Malformed
            })?;

        if claims.sub.trim().is_empty() || claims.exp < claims.iat {
            return Err(TokenError::Malformed);
        }

        if claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

impl fmt::Debug for SessionTokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokenService")
            .field("algorithm", &ALGORITHM)
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish_non_exhaustive()
    }
}

/// Split a compact token into the signed message and its signature
///
/// Requires exactly three non-empty base64url segments.
fn split_signed(token: &str) -> Result<(&str, &str), TokenError> {
    let (message, signature) = token.rsplit_once('.').ok_or(TokenError::Malformed)?;
    let (header, payload) = message.split_once('.').ok_or(TokenError::Malformed)?;

    let well_formed = [header, payload, signature]
        .iter()
        .all(|segment| !segment.is_empty() && segment.bytes().all(is_base64url));

    if well_formed {
        Ok((message, signature))
    } else {
        Err(TokenError::Malformed)
    }
}

fn is_base64url(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}
