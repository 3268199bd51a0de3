use std::future::Future;
use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{info, warn};

use crate::error::AppError;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_INTERVAL_MS: u64 = 500;

/// Retry a connection attempt with fixed interval delays.
/// Returns the result of the last attempt after all retries are exhausted.
async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 1;
    loop {
        match connect_fn().await {
            Ok(conn) => {
                if attempt > 1 {
                    info!(attempts = attempt, "connection_retry=success");
                }
                return Ok(conn);
            }
            Err(e) if attempt >= max_attempts => return Err(e),
            Err(_) => {
                warn!(attempt, max_attempts, interval_ms, "connection_retry=failed");
                tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                attempt += 1;
            }
        }
    }
}

/// Engine name for logging, without leaking credentials.
fn db_engine(url: &str) -> &'static str {
    if url.starts_with("sqlite:") {
        "sqlite"
    } else if url.starts_with("postgres") {
        "postgresql"
    } else {
        "unknown"
    }
}

/// Connect to `url` and bring the schema up to date.
///
/// In-memory SQLite is pinned to a single pooled connection so every query
/// sees the same database.
pub async fn connect_and_migrate(url: &str) -> Result<DatabaseConnection, AppError> {
    let engine = db_engine(url);
    let mut opts = ConnectOptions::new(url.to_owned());
    opts.sqlx_logging(false);
    if url.starts_with("sqlite::memory:") {
        opts.max_connections(1).min_connections(1);
    }

    let conn = retry_connection(
        || {
            let opts = opts.clone();
            async move {
                Database::connect(opts)
                    .await
                    .map_err(|e| AppError::db_unavailable(format!("connect failed: {e}")))
            }
        },
        CONNECT_ATTEMPTS,
        CONNECT_INTERVAL_MS,
    )
    .await?;
    info!(engine, "database connected");

    migrate(&conn, MigrationCommand::Up)
        .await
        .map_err(|e| AppError::internal(format!("migration failed: {e}")))?;
    info!(engine, "migrations applied");

    Ok(conn)
}
