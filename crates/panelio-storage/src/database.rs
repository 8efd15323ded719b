// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.
//! `foreign_keys` is enabled at open so `message_info` cascades with its
//! `message` row.

use tokio_rusqlite::Connection;
use tracing::debug;

use panelio_core::PanelioError;

use crate::migrations::run_migrations;

/// Handle to the SQLite database behind the storage repositories.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (creating if necessary) the database at `path`, apply PRAGMAs,
    /// and run embedded migrations.
    pub async fn open(path: &str) -> Result<Database, PanelioError> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| map_tr_err(e.into()))?;

        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;",
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(|conn| {
            run_migrations(conn).map_err(|e| {
                rusqlite::Error::ToSqlConversionFailure(Box::new(StorageSetupError(e.to_string())))
            })?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, "database opened");
        Ok(Database { conn })
    }

    /// The shared connection handle.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the background connection thread.
    pub async fn close(&self) -> Result<(), PanelioError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Map a tokio-rusqlite error into the workspace error type.
pub fn map_tr_err(e: tokio_rusqlite::Error) -> PanelioError {
    PanelioError::Storage { source: Box::new(e) }
}

/// Wrapper carrying a migration failure through the rusqlite error channel.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct StorageSetupError(String);
