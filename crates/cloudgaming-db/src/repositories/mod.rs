//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in cloudgaming-core.

mod account;
mod error;
mod game;

pub use account::PgAccountRepository;
pub use game::PgGameRepository;
