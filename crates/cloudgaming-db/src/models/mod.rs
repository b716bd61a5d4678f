//! Database models - SQLx-compatible structs for PostgreSQL tables

mod account;
mod game;

pub use account::AccountModel;
pub use game::GameModel;
