//! In-memory repository implementations
//!
//! Used by the test suites and for running the API without PostgreSQL.
//! Same contracts as the PostgreSQL repositories, including the atomic
//! email uniqueness check.

mod account;
mod game;

pub use account::InMemoryAccountRepository;
pub use game::InMemoryGameRepository;
