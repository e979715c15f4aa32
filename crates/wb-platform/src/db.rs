//! SQLite connection bootstrap
//!
//! The pool is created once at process start and passed explicitly to the
//! repositories. Close it with [`SqlitePool::close`] on shutdown.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::shared::error::{PlatformError, Result};

/// Open a pool with foreign-key enforcement on every connection.
pub async fn connect(url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)?
        .foreign_keys(true)
        .create_if_missing(true);

    if let Some(parent) = options.get_filename().parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PlatformError::internal(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    info!(url = %url, max_connections, "Connected to SQLite");
    Ok(pool)
}
