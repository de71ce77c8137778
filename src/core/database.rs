//! Database - SQLite connection pool and embedded migrations

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, instrument};

/// Opens a pool on `database_url`, creating the database file if needed, and
/// applies every pending migration.
///
/// Foreign keys are enforced on every connection: member, proposal and like
/// rows rely on `ON DELETE CASCADE` from their meetup.
///
/// `lifetime` of `None` keeps connections open for the whole life of the
/// pool, which in-memory databases need to keep their content.
#[instrument(skip(database_url))]
pub async fn connect(
    database_url: &str,
    max_connections: u32,
    lifetime: Option<Duration>,
) -> Result<SqlitePool, sqlx::Error> {
    let in_memory = database_url.contains(":memory:");

    let mut options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));
    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .max_lifetime(lifetime)
        .idle_timeout(if in_memory { None } else { Some(Duration::from_secs(600)) })
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database ready, migrations applied");

    Ok(pool)
}

/// Single-connection in-memory pool with the schema applied.
///
/// Every connection to `sqlite::memory:` sees its own database, so the pool
/// is capped at one connection.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    connect("sqlite::memory:", 1, None).await
}
