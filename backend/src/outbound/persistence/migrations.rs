//! Embedded schema migrations.
//!
//! Migrations are compiled into the binary and applied at startup, so a
//! deployment never runs against a schema it does not know about.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use thiserror::Error;

/// All schema migrations shipped with this binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying embedded migrations.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Connecting to the database failed.
    #[error("failed to connect for migrations: {0}")]
    Connection(#[from] diesel::ConnectionError),
    /// Applying a pending migration failed.
    #[error("failed to apply migrations: {0}")]
    Apply(String),
}

/// Apply every pending migration, returning how many ran.
///
/// Opens a dedicated synchronous connection; wrap calls in `spawn_blocking`
/// from async contexts.
///
/// # Errors
/// Returns [`MigrationError`] when the connection cannot be established or a
/// migration fails partway.
pub fn run_pending_migrations(database_url: &str) -> Result<usize, MigrationError> {
    let mut conn = PgConnection::establish(database_url)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply(err.to_string()))?;
    Ok(applied.len())
}
