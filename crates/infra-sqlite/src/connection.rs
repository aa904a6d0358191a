// SQLite Connection Pool Setup
//
// Two handles on one database file. The write handle holds exactly one
// connection, so writers queue on the pool instead of contending for the
// file lock. The read handle fans out and can never mutate.

use crate::error::map_sqlx_error;
use mailroom_core::config::StoreConfig;
use mailroom_core::error::{Result, StoreError};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::info;

/// Write and read handles against the same database file
#[derive(Debug, Clone)]
pub struct StorePools {
    writer: SqlitePool,
    reader: SqlitePool,
}

impl StorePools {
    /// The single-connection write handle
    pub fn writer(&self) -> &SqlitePool {
        &self.writer
    }

    /// The shared read-only handle
    pub fn reader(&self) -> &SqlitePool {
        &self.reader
    }

    /// Close the write handle, then the read handle
    pub async fn close(&self) {
        self.writer.close().await;
        self.reader.close().await;
        info!("Store pools closed");
    }
}

/// Open both pools. Schema provisioning is a separate step ([`crate::run_migrations`]).
pub async fn open_pools(config: &StoreConfig) -> Result<StorePools> {
    config.validate()?;

    // The writer opens first so that it creates the file and switches it to WAL
    let writer_options = SqliteConnectOptions::new()
        .filename(&config.db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(config.busy_timeout);

    let writer = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(0)
        .idle_timeout(Some(config.write_idle_timeout))
        .connect_with(writer_options)
        .await
        .map_err(|e| {
            StoreError::storage(
                format!("failed to open write handle on {}", config.db_path.display()),
                e,
            )
        })?;

    let reader_options = SqliteConnectOptions::new()
        .filename(&config.db_path)
        .create_if_missing(false)
        .foreign_keys(true)
        .busy_timeout(config.busy_timeout)
        .pragma("query_only", "ON");

    let reader = match SqlitePoolOptions::new()
        .max_connections(config.read_pool_size)
        .min_connections(0)
        .idle_timeout(Some(config.read_idle_timeout))
        .connect_with(reader_options)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            writer.close().await;
            return Err(map_sqlx_error(e));
        }
    };

    info!(
        db_path = %config.db_path.display(),
        read_pool_size = config.read_pool_size,
        "Store pools opened"
    );

    Ok(StorePools { writer, reader })
}
