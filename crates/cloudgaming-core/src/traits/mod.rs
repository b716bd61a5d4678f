//! Repository traits (ports)

mod repositories;

pub use repositories::{AccountRepository, GameRepository, RepoResult};
