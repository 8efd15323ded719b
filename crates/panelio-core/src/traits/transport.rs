// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport trait for the chat-platform collaborator.
//!
//! The gateway connection itself (sockets, auth, raw event decoding) lives in
//! a platform adapter crate implementing this trait. The dispatcher only ever
//! sees typed [`InboundEvent`]s and document handles.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::PanelioError;
use crate::types::{
    Actor, ChannelId, Document, DocumentId, GuildId, InboundEvent, NewDocument, Notice, UserId,
};

/// Bidirectional connection to the chat platform hosting the documents.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the current state of a document by id.
    ///
    /// Returns [`PanelioError::NotFound`] when the message no longer exists;
    /// the dispatcher treats that as a tombstone, not a failure.
    async fn fetch_document(
        &self,
        channel: &ChannelId,
        id: &DocumentId,
    ) -> Result<Document, PanelioError>;

    /// Send a new document to a channel and return its platform snapshot.
    async fn send_document(
        &self,
        channel: &ChannelId,
        doc: NewDocument,
    ) -> Result<Document, PanelioError>;

    /// Rewrite an existing document in place.
    async fn edit_document(&self, id: &DocumentId, doc: NewDocument) -> Result<(), PanelioError>;

    /// Delete a document, immediately or after `delay` (fire-and-forget
    /// scheduled self-deletion — the timer lives with the transport).
    async fn delete_document(
        &self,
        id: &DocumentId,
        delay: Option<Duration>,
    ) -> Result<(), PanelioError>;

    /// The most recent documents in a channel, newest first (bulk delete).
    async fn recent_documents(
        &self,
        channel: &ChannelId,
        limit: usize,
    ) -> Result<Vec<Document>, PanelioError>;

    /// Send a short-lived notice to a channel (auto-deleted by the platform).
    async fn send_notice(&self, channel: &ChannelId, notice: Notice) -> Result<(), PanelioError>;

    /// Send a document to a user's direct-message channel.
    async fn send_direct(&self, user: &UserId, doc: NewDocument)
        -> Result<Document, PanelioError>;

    /// Open a named thread hanging off a document.
    async fn create_thread(&self, document: &DocumentId, name: &str) -> Result<(), PanelioError>;

    /// Archive the thread hanging off a document.
    async fn archive_thread(&self, document: &DocumentId) -> Result<(), PanelioError>;

    /// Resolve a guild member to an [`Actor`], or `None` when they left.
    async fn resolve_member(&self, guild: &GuildId, user: &UserId) -> Option<Actor>;

    /// Role names defined in a guild, highest first.
    async fn guild_roles(&self, guild: &GuildId) -> Result<Vec<String>, PanelioError>;

    /// The next typed inbound event. Errors here terminate the dispatch loop;
    /// every other error path keeps it running.
    async fn next_event(&self) -> Result<InboundEvent, PanelioError>;
}
