//! Embedded schema migrations
//!
//! Every script is idempotent, so the whole list is applied on each start.

use sqlx::PgPool;
use tracing::{debug, info};

/// Ordered `(name, sql)` pairs
pub const MIGRATIONS: &[(&str, &str)] = &[
    (
        "0001_accounts_and_games",
        include_str!("../../migrations/0001_accounts_and_games.sql"),
    ),
    (
        "0002_seed_games",
        include_str!("../../migrations/0002_seed_games.sql"),
    ),
];

/// Apply all migrations in order
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    for (name, sql) in MIGRATIONS {
        debug!(migration = %name, "Applying migration");
        sqlx::raw_sql(*sql).execute(pool).await?;
    }

    info!(count = MIGRATIONS.len(), "Database migrations applied");
    Ok(())
}
