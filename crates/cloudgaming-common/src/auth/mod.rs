//! Credential hashing and session tokens

mod password;
mod token;

pub use password::{
    validate_password_strength, CredentialStore, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH,
};
pub use token::{
    IssuedToken, SessionClaims, SessionTokenService, TokenError, MAX_TOKEN_TTL_SECS, MIN_SECRET_LEN,
    TOKEN_TYPE,
};
