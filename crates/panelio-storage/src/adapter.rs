// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the storage repository traits.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use panelio_config::model::StorageConfig;
use panelio_core::traits::{CounterStore, GuildOptionStore, MessageStore};
use panelio_core::types::{DocumentId, GuildId, InfoRow, MessageRecord, UserId};
use panelio_core::PanelioError;

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage implementing all three repository traits.
///
/// Wraps a [`Database`] handle and delegates to the typed query modules.
/// The database is lazily opened on the first call to [`initialize`].
///
/// [`initialize`]: SqliteStore::initialize
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Create a new store with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`] is called.
    ///
    /// [`initialize`]: SqliteStore::initialize
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Open the database, apply PRAGMAs, run migrations.
    pub async fn initialize(&self) -> Result<(), PanelioError> {
        let db = Database::open(&self.config.database_path).await?;
        self.db.set(db).map_err(|_| PanelioError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    /// Checkpoint the WAL and release the connection.
    pub async fn close(&self) -> Result<(), PanelioError> {
        self.db()?.close().await
    }

    fn db(&self) -> Result<&Database, PanelioError> {
        self.db.get().ok_or_else(|| PanelioError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl MessageStore for SqliteStore {
    async fn get_message(&self, id: &DocumentId) -> Result<Option<MessageRecord>, PanelioError> {
        queries::messages::get_message(self.db()?, id).await
    }

    async fn get_message_with_info(
        &self,
        id: &DocumentId,
    ) -> Result<Option<MessageRecord>, PanelioError> {
        queries::messages::get_message_with_info(self.db()?, id).await
    }

    async fn get_info(
        &self,
        id: &DocumentId,
        name: Option<&str>,
        user: Option<&UserId>,
    ) -> Result<Vec<InfoRow>, PanelioError> {
        queries::messages::get_info(self.db()?, id, name, user).await
    }

    async fn messages_with_info_named(
        &self,
        name: &str,
    ) -> Result<Vec<(MessageRecord, InfoRow)>, PanelioError> {
        queries::messages::messages_with_info_named(self.db()?, name).await
    }

    async fn add_message(&self, record: MessageRecord) -> Result<(), PanelioError> {
        queries::messages::add_message(self.db()?, &record).await
    }

    async fn update_author(
        &self,
        id: &DocumentId,
        author: Option<&UserId>,
    ) -> Result<(), PanelioError> {
        queries::messages::update_author(self.db()?, id, author).await
    }

    async fn delete_message(&self, id: &DocumentId) -> Result<(), PanelioError> {
        queries::messages::delete_message(self.db()?, id).await
    }

    async fn add_info(&self, id: &DocumentId, row: InfoRow) -> Result<(), PanelioError> {
        queries::messages::add_info(self.db()?, id, &row).await
    }

    async fn delete_info(
        &self,
        id: &DocumentId,
        name: &str,
        user: Option<&UserId>,
    ) -> Result<(), PanelioError> {
        queries::messages::delete_info(self.db()?, id, name, user).await
    }
}

#[async_trait]
impl GuildOptionStore for SqliteStore {
    async fn get_option(&self, guild: &GuildId, name: &str) -> Result<Vec<String>, PanelioError> {
        queries::options::get_option(self.db()?, guild, name).await
    }

    async fn set_option(
        &self,
        guild: &GuildId,
        name: &str,
        values: &[String],
    ) -> Result<(), PanelioError> {
        queries::options::set_option(self.db()?, guild, name, values).await
    }

    async fn delete_option(&self, guild: &GuildId, name: &str) -> Result<(), PanelioError> {
        queries::options::delete_option(self.db()?, guild, name).await
    }
}

#[async_trait]
impl CounterStore for SqliteStore {
    async fn get_counter(
        &self,
        user: &UserId,
        guild: &GuildId,
        name: &str,
    ) -> Result<Option<i64>, PanelioError> {
        queries::counters::get_counter(self.db()?, user, guild, name).await
    }

    async fn put_counter(
        &self,
        user: &UserId,
        guild: &GuildId,
        name: &str,
        value: i64,
    ) -> Result<(), PanelioError> {
        queries::counters::put_counter(self.db()?, user, guild, name, value).await
    }

    async fn counters_named(
        &self,
        guild: &GuildId,
        name: &str,
    ) -> Result<Vec<(UserId, i64)>, PanelioError> {
        queries::counters::counters_named(self.db()?, guild, name).await
    }
}
