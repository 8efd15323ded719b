// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Repository traits for the persistent storage collaborator.
//!
//! All operations are request/response; no transactions span calls. The
//! SQLite implementation lives in `panelio-storage`.

use async_trait::async_trait;

use crate::error::PanelioError;
use crate::types::{DocumentId, GuildId, InfoRow, MessageRecord, UserId};

/// Durable shadow records for documents and their keyed info rows.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Fetch a message record without its info rows.
    async fn get_message(&self, id: &DocumentId) -> Result<Option<MessageRecord>, PanelioError>;

    /// Fetch a message record with all of its info rows.
    async fn get_message_with_info(
        &self,
        id: &DocumentId,
    ) -> Result<Option<MessageRecord>, PanelioError>;

    /// Info rows for a message, optionally filtered by name and/or user.
    async fn get_info(
        &self,
        id: &DocumentId,
        name: Option<&str>,
        user: Option<&UserId>,
    ) -> Result<Vec<InfoRow>, PanelioError>;

    /// All messages carrying an info row with the given name, paired with
    /// that row (deletion-timer restart scans `deletion_time` this way).
    async fn messages_with_info_named(
        &self,
        name: &str,
    ) -> Result<Vec<(MessageRecord, InfoRow)>, PanelioError>;

    /// Create a message record, together with any initial info rows.
    async fn add_message(&self, record: MessageRecord) -> Result<(), PanelioError>;

    /// Replace the recorded author of a message.
    async fn update_author(
        &self,
        id: &DocumentId,
        author: Option<&UserId>,
    ) -> Result<(), PanelioError>;

    /// Delete a message record. Cascades to all of its info rows.
    async fn delete_message(&self, id: &DocumentId) -> Result<(), PanelioError>;

    /// Attach one info row to an existing message record.
    async fn add_info(&self, id: &DocumentId, row: InfoRow) -> Result<(), PanelioError>;

    /// Remove info rows by name, optionally restricted to one user.
    async fn delete_info(
        &self,
        id: &DocumentId,
        name: &str,
        user: Option<&UserId>,
    ) -> Result<(), PanelioError>;
}

/// Per-guild named configuration options (lists of strings).
#[async_trait]
pub trait GuildOptionStore: Send + Sync {
    /// Values of a named option; empty when unset.
    async fn get_option(&self, guild: &GuildId, name: &str) -> Result<Vec<String>, PanelioError>;

    /// Replace a named option with the given values.
    async fn set_option(
        &self,
        guild: &GuildId,
        name: &str,
        values: &[String],
    ) -> Result<(), PanelioError>;

    /// Remove a named option entirely.
    async fn delete_option(&self, guild: &GuildId, name: &str) -> Result<(), PanelioError>;
}

/// Per-user, per-guild named counters (game wins and similar tallies).
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Current value, or `None` when the counter does not exist yet.
    async fn get_counter(
        &self,
        user: &UserId,
        guild: &GuildId,
        name: &str,
    ) -> Result<Option<i64>, PanelioError>;

    /// Create or overwrite a counter.
    async fn put_counter(
        &self,
        user: &UserId,
        guild: &GuildId,
        name: &str,
        value: i64,
    ) -> Result<(), PanelioError>;

    /// All counters with the given name in a guild (leaderboards).
    async fn counters_named(
        &self,
        guild: &GuildId,
        name: &str,
    ) -> Result<Vec<(UserId, i64)>, PanelioError>;
}

/// Increment a user's named counter by one and return the new value.
///
/// Read-modify-write without a transaction; the rare lost increment under
/// contention is accepted, matching the eventual-consistency stance of
/// non-serialized capabilities.
pub async fn increment_counter(
    store: &dyn CounterStore,
    user: &UserId,
    guild: &GuildId,
    name: &str,
) -> Result<i64, PanelioError> {
    let next = match store.get_counter(user, guild, name).await? {
        Some(value) => value + 1,
        None => 1,
    };
    store.put_counter(user, guild, name, next).await?;
    Ok(next)
}
