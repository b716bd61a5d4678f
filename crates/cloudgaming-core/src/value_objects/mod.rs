//! Value objects - immutable types that represent domain concepts

mod email;
mod password_digest;

pub use email::Email;
pub use password_digest::PasswordDigest;
