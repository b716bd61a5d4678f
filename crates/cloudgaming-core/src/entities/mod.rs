//! Domain entities - core business objects

mod account;
mod game;

pub use account::{Account, AccountStatus};
pub use game::{Game, GameStatus};
