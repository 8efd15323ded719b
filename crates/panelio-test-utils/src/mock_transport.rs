// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock transport for deterministic testing.
//!
//! `MockTransport` implements [`Transport`] with an in-memory document map,
//! injectable inbound events, and captured writes for assertion. Immediate
//! deletions echo a [`InboundEvent::Delete`] back into the event stream, the
//! way the real platform notifies deletions.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use panelio_core::types::{
    Actor, ChannelId, Control, Document, DocumentId, GuildId, InboundEvent, NewDocument, Notice,
    UserId,
};
use panelio_core::{PanelioError, Transport};

#[derive(Default)]
struct MockState {
    documents: HashMap<String, Document>,
    /// Send order per channel, oldest first.
    channel_order: Vec<DocumentId>,
    events: VecDeque<InboundEvent>,
    edits: Vec<(DocumentId, NewDocument)>,
    notices: Vec<(ChannelId, Notice)>,
    directs: Vec<(UserId, DocumentId)>,
    threads: Vec<(DocumentId, String)>,
    archived: Vec<DocumentId>,
    scheduled_deletions: Vec<(DocumentId, Duration)>,
    members: HashMap<String, Actor>,
    roles: Vec<String>,
}

/// A mock chat platform holding documents in memory.
pub struct MockTransport {
    state: Mutex<MockState>,
    notify: Notify,
    next_id: AtomicU64,
    guild: GuildId,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            notify: Notify::new(),
            next_id: AtomicU64::new(1),
            guild: GuildId("guild-1".into()),
        }
    }

    fn mint(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Assign control ids the way the platform does on every write.
    fn assign_control_ids(&self, controls: &mut [Control]) {
        for control in controls {
            match control {
                Control::Button(b) => b.id = self.mint("ctl"),
                Control::Menu(m) => m.id = self.mint("ctl"),
            }
        }
    }

    fn materialize(&self, channel: &ChannelId, mut doc: NewDocument) -> Document {
        self.assign_control_ids(&mut doc.controls);
        Document {
            id: DocumentId(self.mint("doc")),
            channel_id: channel.clone(),
            guild_id: self.guild.clone(),
            title: doc.title,
            body: doc.body,
            color: doc.color,
            content: doc.content,
            controls: doc.controls,
            footer: doc.footer,
            pinned: false,
            from_self: true,
        }
    }

    /// Inject an inbound event; the next `next_event()` call returns it.
    pub async fn inject_event(&self, event: InboundEvent) {
        self.state.lock().await.events.push_back(event);
        self.notify.notify_one();
    }

    /// Register a guild member for `resolve_member`.
    pub async fn add_member(&self, actor: Actor) {
        self.state
            .lock()
            .await
            .members
            .insert(actor.id.0.clone(), actor);
    }

    /// Set the guild's role list for `guild_roles`.
    pub async fn set_roles(&self, roles: Vec<String>) {
        self.state.lock().await.roles = roles;
    }

    /// Current snapshot of a stored document.
    pub async fn document(&self, id: &DocumentId) -> Option<Document> {
        self.state.lock().await.documents.get(&id.0).cloned()
    }

    /// Pin or unpin a stored document.
    pub async fn set_pinned(&self, id: &DocumentId, pinned: bool) {
        if let Some(doc) = self.state.lock().await.documents.get_mut(&id.0) {
            doc.pinned = pinned;
        }
    }

    /// The most recently sent document, if any.
    pub async fn last_sent(&self) -> Option<Document> {
        let state = self.state.lock().await;
        state
            .channel_order
            .last()
            .and_then(|id| state.documents.get(&id.0))
            .cloned()
    }

    /// All captured notices, in send order.
    pub async fn notices(&self) -> Vec<(ChannelId, Notice)> {
        self.state.lock().await.notices.clone()
    }

    /// All captured edits, in apply order.
    pub async fn edit_count(&self) -> usize {
        self.state.lock().await.edits.len()
    }

    /// Deletions scheduled with a delay (document still present).
    pub async fn scheduled_deletions(&self) -> Vec<(DocumentId, Duration)> {
        self.state.lock().await.scheduled_deletions.clone()
    }

    /// Threads created, as `(parent document, name)` pairs.
    pub async fn threads(&self) -> Vec<(DocumentId, String)> {
        self.state.lock().await.threads.clone()
    }

    /// Parents of archived threads.
    pub async fn archived_threads(&self) -> Vec<DocumentId> {
        self.state.lock().await.archived.clone()
    }

    /// Direct-message documents, as `(user, document)` pairs.
    pub async fn directs(&self) -> Vec<(UserId, DocumentId)> {
        self.state.lock().await.directs.clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn fetch_document(
        &self,
        _channel: &ChannelId,
        id: &DocumentId,
    ) -> Result<Document, PanelioError> {
        self.state
            .lock()
            .await
            .documents
            .get(&id.0)
            .cloned()
            .ok_or_else(|| PanelioError::NotFound {
                what: format!("document {id}"),
            })
    }

    async fn send_document(
        &self,
        channel: &ChannelId,
        doc: NewDocument,
    ) -> Result<Document, PanelioError> {
        let doc = self.materialize(channel, doc);
        let mut state = self.state.lock().await;
        state.channel_order.push(doc.id.clone());
        state.documents.insert(doc.id.0.clone(), doc.clone());
        Ok(doc)
    }

    async fn edit_document(&self, id: &DocumentId, mut doc: NewDocument) -> Result<(), PanelioError> {
        self.assign_control_ids(&mut doc.controls);
        let mut state = self.state.lock().await;
        let Some(stored) = state.documents.get_mut(&id.0) else {
            return Err(PanelioError::NotFound {
                what: format!("document {id}"),
            });
        };
        stored.title = doc.title.clone();
        stored.body = doc.body.clone();
        stored.color = doc.color;
        stored.content = doc.content.clone();
        stored.controls = doc.controls.clone();
        stored.footer = doc.footer.clone();
        state.edits.push((id.clone(), doc));
        Ok(())
    }

    async fn delete_document(
        &self,
        id: &DocumentId,
        delay: Option<Duration>,
    ) -> Result<(), PanelioError> {
        let mut state = self.state.lock().await;
        if !state.documents.contains_key(&id.0) {
            return Err(PanelioError::NotFound {
                what: format!("document {id}"),
            });
        }
        match delay {
            Some(delay) => {
                // Fire-and-forget timer; the mock only records it.
                state.scheduled_deletions.push((id.clone(), delay));
            }
            None => {
                state.documents.remove(&id.0);
                state.channel_order.retain(|d| d != id);
                // The platform echoes deletions back as raw events.
                state.events.push_back(InboundEvent::Delete { document: id.clone() });
                self.notify.notify_one();
            }
        }
        Ok(())
    }

    async fn recent_documents(
        &self,
        channel: &ChannelId,
        limit: usize,
    ) -> Result<Vec<Document>, PanelioError> {
        let state = self.state.lock().await;
        Ok(state
            .channel_order
            .iter()
            .rev()
            .filter_map(|id| state.documents.get(&id.0))
            .filter(|doc| &doc.channel_id == channel)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn send_notice(&self, channel: &ChannelId, notice: Notice) -> Result<(), PanelioError> {
        self.state.lock().await.notices.push((channel.clone(), notice));
        Ok(())
    }

    async fn send_direct(
        &self,
        user: &UserId,
        doc: NewDocument,
    ) -> Result<Document, PanelioError> {
        let channel = ChannelId(format!("dm-{user}"));
        let doc = self.materialize(&channel, doc);
        let mut state = self.state.lock().await;
        state.channel_order.push(doc.id.clone());
        state.documents.insert(doc.id.0.clone(), doc.clone());
        state.directs.push((user.clone(), doc.id.clone()));
        Ok(doc)
    }

    async fn create_thread(&self, document: &DocumentId, name: &str) -> Result<(), PanelioError> {
        self.state
            .lock()
            .await
            .threads
            .push((document.clone(), name.to_string()));
        Ok(())
    }

    async fn archive_thread(&self, document: &DocumentId) -> Result<(), PanelioError> {
        self.state.lock().await.archived.push(document.clone());
        Ok(())
    }

    async fn resolve_member(&self, _guild: &GuildId, user: &UserId) -> Option<Actor> {
        let state = self.state.lock().await;
        state
            .members
            .get(&user.0)
            .cloned()
            .or_else(|| Some(Actor::member(user.0.clone(), format!("user-{user}"))))
    }

    async fn guild_roles(&self, _guild: &GuildId) -> Result<Vec<String>, PanelioError> {
        Ok(self.state.lock().await.roles.clone())
    }

    async fn next_event(&self) -> Result<InboundEvent, PanelioError> {
        loop {
            {
                let mut state = self.state.lock().await;
                if let Some(event) = state.events.pop_front() {
                    return Ok(event);
                }
            }
            self.notify.notified().await;
        }
    }
}
