// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory store implementations with failure injection.
//!
//! Gate tests flip the failure toggles to verify fail-open behavior without
//! a real database going away underneath them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use panelio_core::traits::{CounterStore, GuildOptionStore, MessageStore};
use panelio_core::types::{DocumentId, GuildId, InfoRow, MessageRecord, UserId};
use panelio_core::PanelioError;

/// All three repository traits over in-memory maps.
#[derive(Default)]
pub struct MemoryStores {
    messages: Mutex<HashMap<String, MessageRecord>>,
    options: Mutex<HashMap<(String, String), Vec<String>>>,
    counters: Mutex<HashMap<(String, String, String), i64>>,
    fail_messages: AtomicBool,
    fail_options: AtomicBool,
}

impl MemoryStores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every message-store call fail (storage outage simulation).
    pub fn fail_messages(&self, fail: bool) {
        self.fail_messages.store(fail, Ordering::SeqCst);
    }

    /// Make every option-store call fail.
    pub fn fail_options(&self, fail: bool) {
        self.fail_options.store(fail, Ordering::SeqCst);
    }

    fn messages_outage(&self) -> Result<(), PanelioError> {
        if self.fail_messages.load(Ordering::SeqCst) {
            return Err(PanelioError::Storage {
                source: "message store unavailable".into(),
            });
        }
        Ok(())
    }

    fn options_outage(&self) -> Result<(), PanelioError> {
        if self.fail_options.load(Ordering::SeqCst) {
            return Err(PanelioError::Storage {
                source: "option store unavailable".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MessageStore for MemoryStores {
    async fn get_message(&self, id: &DocumentId) -> Result<Option<MessageRecord>, PanelioError> {
        self.messages_outage()?;
        Ok(self.messages.lock().await.get(&id.0).map(|record| {
            let mut record = record.clone();
            record.info = Vec::new();
            record
        }))
    }

    async fn get_message_with_info(
        &self,
        id: &DocumentId,
    ) -> Result<Option<MessageRecord>, PanelioError> {
        self.messages_outage()?;
        Ok(self.messages.lock().await.get(&id.0).cloned())
    }

    async fn get_info(
        &self,
        id: &DocumentId,
        name: Option<&str>,
        user: Option<&UserId>,
    ) -> Result<Vec<InfoRow>, PanelioError> {
        self.messages_outage()?;
        Ok(self
            .messages
            .lock()
            .await
            .get(&id.0)
            .map(|record| {
                record
                    .info
                    .iter()
                    .filter(|row| name.is_none_or(|n| row.name == n))
                    .filter(|row| user.is_none_or(|u| row.user_id.as_ref() == Some(u)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn messages_with_info_named(
        &self,
        name: &str,
    ) -> Result<Vec<(MessageRecord, InfoRow)>, PanelioError> {
        self.messages_outage()?;
        let messages = self.messages.lock().await;
        let mut out = Vec::new();
        for record in messages.values() {
            for row in &record.info {
                if row.name == name {
                    let mut bare = record.clone();
                    bare.info = Vec::new();
                    out.push((bare, row.clone()));
                }
            }
        }
        out.sort_by(|a, b| a.0.id.0.cmp(&b.0.id.0));
        Ok(out)
    }

    async fn add_message(&self, record: MessageRecord) -> Result<(), PanelioError> {
        self.messages_outage()?;
        self.messages
            .lock()
            .await
            .insert(record.id.0.clone(), record);
        Ok(())
    }

    async fn update_author(
        &self,
        id: &DocumentId,
        author: Option<&UserId>,
    ) -> Result<(), PanelioError> {
        self.messages_outage()?;
        if let Some(record) = self.messages.lock().await.get_mut(&id.0) {
            record.author_id = author.cloned();
        }
        Ok(())
    }

    async fn delete_message(&self, id: &DocumentId) -> Result<(), PanelioError> {
        self.messages_outage()?;
        self.messages.lock().await.remove(&id.0);
        Ok(())
    }

    async fn add_info(&self, id: &DocumentId, row: InfoRow) -> Result<(), PanelioError> {
        self.messages_outage()?;
        if let Some(record) = self.messages.lock().await.get_mut(&id.0) {
            record.info.push(row);
        }
        Ok(())
    }

    async fn delete_info(
        &self,
        id: &DocumentId,
        name: &str,
        user: Option<&UserId>,
    ) -> Result<(), PanelioError> {
        self.messages_outage()?;
        if let Some(record) = self.messages.lock().await.get_mut(&id.0) {
            record.info.retain(|row| {
                row.name != name || user.is_some_and(|u| row.user_id.as_ref() != Some(u))
            });
        }
        Ok(())
    }
}

#[async_trait]
impl GuildOptionStore for MemoryStores {
    async fn get_option(&self, guild: &GuildId, name: &str) -> Result<Vec<String>, PanelioError> {
        self.options_outage()?;
        Ok(self
            .options
            .lock()
            .await
            .get(&(guild.0.clone(), name.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn set_option(
        &self,
        guild: &GuildId,
        name: &str,
        values: &[String],
    ) -> Result<(), PanelioError> {
        self.options_outage()?;
        self.options
            .lock()
            .await
            .insert((guild.0.clone(), name.to_string()), values.to_vec());
        Ok(())
    }

    async fn delete_option(&self, guild: &GuildId, name: &str) -> Result<(), PanelioError> {
        self.options_outage()?;
        self.options
            .lock()
            .await
            .remove(&(guild.0.clone(), name.to_string()));
        Ok(())
    }
}

#[async_trait]
impl CounterStore for MemoryStores {
    async fn get_counter(
        &self,
        user: &UserId,
        guild: &GuildId,
        name: &str,
    ) -> Result<Option<i64>, PanelioError> {
        Ok(self
            .counters
            .lock()
            .await
            .get(&(user.0.clone(), guild.0.clone(), name.to_string()))
            .copied())
    }

    async fn put_counter(
        &self,
        user: &UserId,
        guild: &GuildId,
        name: &str,
        value: i64,
    ) -> Result<(), PanelioError> {
        self.counters
            .lock()
            .await
            .insert((user.0.clone(), guild.0.clone(), name.to_string()), value);
        Ok(())
    }

    async fn counters_named(
        &self,
        guild: &GuildId,
        name: &str,
    ) -> Result<Vec<(UserId, i64)>, PanelioError> {
        let counters = self.counters.lock().await;
        let mut out: Vec<(UserId, i64)> = counters
            .iter()
            .filter(|((_, g, n), _)| g == &guild.0 && n == name)
            .map(|((u, _, _), value)| (UserId(u.clone()), *value))
            .collect();
        out.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(out)
    }
}
