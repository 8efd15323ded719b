// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end screen testing.
//!
//! `TestHarness` assembles a dispatcher over a [`MockTransport`] and either a
//! temp SQLite database or in-memory stores, then exposes event constructors
//! (`mention`, `click_label`, `select`, ...) that drive the full dispatch
//! pipeline synchronously.

use std::sync::Arc;

use panelio_core::types::{
    Actor, ChannelId, ChatMessage, Document, DocumentId, GuildId, InboundEvent, UserId,
};
use panelio_core::PanelioError;
use panelio_dispatch::{Context, Dispatcher};
use panelio_registry::{RegistryBuilder, Screen};
use panelio_storage::SqliteStore;

use crate::memory_stores::MemoryStores;
use crate::mock_transport::MockTransport;

type ScreenFactory = Box<dyn FnOnce(Arc<Context>) -> Vec<Arc<dyn Screen>> + Send>;

/// Builder for creating test environments with configurable screens/stores.
pub struct TestHarnessBuilder {
    screens: Option<ScreenFactory>,
    memory_stores: bool,
    version: String,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            screens: None,
            memory_stores: false,
            version: "0.0.0-test".to_string(),
        }
    }

    /// Construct screens once the context exists (screens hold the context).
    pub fn with_screens<F>(mut self, factory: F) -> Self
    where
        F: FnOnce(Arc<Context>) -> Vec<Arc<dyn Screen>> + Send + 'static,
    {
        self.screens = Some(Box::new(factory));
        self
    }

    /// Use in-memory stores (with failure injection) instead of temp SQLite.
    pub fn with_memory_stores(mut self) -> Self {
        self.memory_stores = true;
        self
    }

    /// Override the version stamped into footers.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Build the harness, wiring transport, stores, context, and registry.
    pub async fn build(self) -> Result<TestHarness, PanelioError> {
        let transport = Arc::new(MockTransport::new());

        let mut memory = None;
        let mut temp_dir = None;
        let (messages, options, counters): (
            Arc<dyn panelio_core::MessageStore>,
            Arc<dyn panelio_core::GuildOptionStore>,
            Arc<dyn panelio_core::CounterStore>,
        ) = if self.memory_stores {
            let stores = Arc::new(MemoryStores::new());
            memory = Some(Arc::clone(&stores));
            (stores.clone(), stores.clone(), stores)
        } else {
            let dir = tempfile::TempDir::new()
                .map_err(|e| PanelioError::Storage { source: e.into() })?;
            let db_path = dir.path().join("test.db");
            let store = SqliteStore::new(panelio_config::model::StorageConfig {
                database_path: db_path.to_string_lossy().to_string(),
                wal_mode: true,
            });
            store.initialize().await?;
            temp_dir = Some(dir);
            let store = Arc::new(store);
            (store.clone(), store.clone(), store)
        };

        let ctx = Arc::new(Context::new(
            transport.clone(),
            messages,
            options,
            counters,
            self.version,
        ));

        let mut builder = RegistryBuilder::new();
        if let Some(factory) = self.screens {
            for screen in factory(Arc::clone(&ctx)) {
                builder = builder.register(screen);
            }
        }
        ctx.install_registry(builder.build())?;

        let dispatcher = Dispatcher::new(Arc::clone(&ctx));

        Ok(TestHarness {
            transport,
            ctx,
            dispatcher,
            memory,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment around the dispatcher.
pub struct TestHarness {
    /// The mock chat platform.
    pub transport: Arc<MockTransport>,
    /// The shared dispatch context (stores, queue, registry).
    pub ctx: Arc<Context>,
    /// The dispatcher under test.
    pub dispatcher: Dispatcher,
    /// In-memory stores, when built with `with_memory_stores()`.
    pub memory: Option<Arc<MemoryStores>>,
    _temp_dir: Option<tempfile::TempDir>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// The default test channel.
    pub fn channel(&self) -> ChannelId {
        ChannelId("chan-1".into())
    }

    pub fn guild(&self) -> GuildId {
        GuildId("guild-1".into())
    }

    fn chat_message(&self, actor: &Actor, channel: &ChannelId, text: &str) -> ChatMessage {
        ChatMessage {
            id: DocumentId(format!("msg-{}", uuid_lite())),
            channel_id: channel.clone(),
            guild_id: self.guild(),
            author: actor.clone(),
            text: text.to_string(),
        }
    }

    /// Mention the process's user; `args` go after the mention token.
    pub async fn mention(&self, actor: &Actor, args: &str) {
        let channel = self.channel();
        let text = if args.is_empty() {
            "@panelio".to_string()
        } else {
            format!("@panelio {args}")
        };
        let message = self.chat_message(actor, &channel, &text);
        self.dispatcher
            .handle_event(InboundEvent::Mention { message })
            .await;
    }

    /// Make a menu selection on a document.
    pub async fn select(&self, doc: &DocumentId, actor: &Actor, values: &[&str]) {
        let channel = self.doc_channel(doc).await;
        self.dispatcher
            .handle_event(InboundEvent::MenuSelect {
                document: doc.clone(),
                channel,
                actor: actor.clone(),
                values: values.iter().map(|v| v.to_string()).collect(),
            })
            .await;
    }

    /// Click the first button whose label matches.
    pub async fn click_label(&self, doc: &DocumentId, actor: &Actor, label: &str) {
        let control_id = self
            .transport
            .document(doc)
            .await
            .and_then(|d| d.buttons().find(|b| b.label == label).map(|b| b.id.clone()))
            .unwrap_or_else(|| panic!("no button labelled {label:?} on {doc}"));
        self.click_control(doc, actor, &control_id).await;
    }

    /// Click the first button carrying the given emoji.
    pub async fn click_emoji(&self, doc: &DocumentId, actor: &Actor, emoji: &str) {
        let control_id = self
            .transport
            .document(doc)
            .await
            .and_then(|d| {
                d.buttons()
                    .find(|b| b.emoji.as_deref() == Some(emoji))
                    .map(|b| b.id.clone())
            })
            .unwrap_or_else(|| panic!("no button with emoji {emoji:?} on {doc}"));
        self.click_control(doc, actor, &control_id).await;
    }

    /// Click a button by raw control id.
    pub async fn click_control(&self, doc: &DocumentId, actor: &Actor, control_id: &str) {
        let channel = self.doc_channel(doc).await;
        self.dispatcher
            .handle_event(InboundEvent::ButtonClick {
                document: doc.clone(),
                channel,
                actor: actor.clone(),
                control_id: control_id.to_string(),
            })
            .await;
    }

    /// Reply directly to a document.
    pub async fn reply(&self, doc: &DocumentId, actor: &Actor, text: &str) {
        let channel = self.doc_channel(doc).await;
        let message = self.chat_message(actor, &channel, text);
        self.dispatcher
            .handle_event(InboundEvent::Reply {
                message,
                target: doc.clone(),
            })
            .await;
    }

    /// Send a message into the thread hanging off a document.
    pub async fn thread_message(&self, parent: &DocumentId, actor: &Actor, text: &str) {
        let channel = self.doc_channel(parent).await;
        let message = self.chat_message(actor, &channel, text);
        self.dispatcher
            .handle_event(InboundEvent::ThreadMessage {
                message,
                parent: parent.clone(),
            })
            .await;
    }

    /// Deliver a raw deletion notification.
    pub async fn raw_delete(&self, doc: &DocumentId) {
        self.dispatcher
            .handle_event(InboundEvent::Delete { document: doc.clone() })
            .await;
    }

    /// Snapshot of a stored document; panics when missing.
    pub async fn document(&self, id: &DocumentId) -> Document {
        self.transport
            .document(id)
            .await
            .unwrap_or_else(|| panic!("document {id} not stored"))
    }

    /// The most recently sent document; panics when none was sent.
    pub async fn last_sent(&self) -> Document {
        self.transport
            .last_sent()
            .await
            .expect("no document was sent")
    }

    async fn doc_channel(&self, doc: &DocumentId) -> ChannelId {
        self.transport
            .document(doc)
            .await
            .map(|d| d.channel_id)
            .unwrap_or_else(|| self.channel())
    }
}

/// An administrator actor for tests.
pub fn admin(id: &str, name: &str) -> Actor {
    Actor {
        id: UserId(id.into()),
        display_name: name.into(),
        roles: Vec::new(),
        is_admin: true,
        can_manage_messages: true,
    }
}

/// A plain member actor for tests.
pub fn member(id: &str, name: &str) -> Actor {
    Actor::member(id, name)
}

/// A member carrying the given roles.
pub fn member_with_roles(id: &str, name: &str, roles: &[&str]) -> Actor {
    let mut actor = Actor::member(id, name);
    actor.roles = roles.iter().map(|r| r.to_string()).collect();
    actor
}

fn uuid_lite() -> u64 {
    use std::sync::atomic::{AtomicU64, Ordering};
    static NEXT: AtomicU64 = AtomicU64::new(1);
    NEXT.fetch_add(1, Ordering::SeqCst)
}
