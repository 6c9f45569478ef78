// SPDX-FileCopyrightText: 2026 Doshka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All reads and writes are serialized through tokio-rusqlite's single
//! background thread; the [`Database`] struct IS the single writer, which
//! makes counter allocation atomic without read-then-write races.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;

use doshka_core::DoshkaError;
use tracing::debug;

use crate::migrations;

/// A WAL-mode SQLite database behind a single async connection.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path`, applies PRAGMAs,
    /// and runs pending migrations.
    ///
    /// Migrations run on a short-lived blocking connection before the async
    /// connection opens; refinery needs exclusive `&mut Connection` access.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, DoshkaError> {
        let migrate_path = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), DoshkaError> {
            if let Some(parent) = Path::new(&migrate_path).parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent).map_err(|e| DoshkaError::Store {
                    source: Box::new(e),
                })?;
            }
            let mut conn = rusqlite::Connection::open(&migrate_path).map_err(map_sql_err)?;
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")
                    .map_err(map_sql_err)?;
            }
            migrations::run_migrations(&mut conn)
        })
        .await
        .map_err(|e| DoshkaError::Internal(format!("migration task panicked: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(map_tr_err)?;

        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA foreign_keys = ON;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA busy_timeout = 5000;",
            )?;
            Ok::<_, rusqlite::Error>(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// Returns the underlying async connection for query modules.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoints the WAL and flushes pending writes.
    pub async fn close(&self) -> Result<(), DoshkaError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok::<_, rusqlite::Error>(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Maps a connection-layer error into the store error variant.
pub(crate) fn map_tr_err<E>(e: E) -> DoshkaError
where
    E: std::error::Error + Send + Sync + 'static,
{
    DoshkaError::Store {
        source: Box::new(e),
    }
}

fn map_sql_err(e: rusqlite::Error) -> DoshkaError {
    DoshkaError::Store {
        source: Box::new(e),
    }
}
