//! # cloudgaming-db
//!
//! Database layer implementing the repository traits from `cloudgaming-core`.
//!
//! ## Overview
//!
//! - Connection pool management
//! - Embedded schema migrations (accounts, game catalog, sample games)
//! - Database models with SQLx `FromRow` derives and model → entity mappers
//! - PostgreSQL repository implementations
//! - In-memory repository implementations for tests and local runs
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cloudgaming_db::{create_pool, run_migrations, PgAccountRepository};
//!
//! async fn example(config: &cloudgaming_common::DatabaseConfig) -> Result<(), sqlx::Error> {
//!     let pool = create_pool(config).await?;
//!     run_migrations(&pool).await?;
//!     let accounts = PgAccountRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod migrations;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::{InMemoryAccountRepository, InMemoryGameRepository};
pub use migrations::run_migrations;
pub use pool::{create_pool, PgPool};
pub use repositories::{PgAccountRepository, PgGameRepository};
