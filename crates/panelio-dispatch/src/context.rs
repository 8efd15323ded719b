// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared dispatch context.
//!
//! One [`Context`] is built at startup and passed by `Arc` to the dispatcher
//! and every screen. The capability registry is installed once after the
//! screens are constructed (they need the context first) and is read-only
//! from then on.

use std::sync::{Arc, OnceLock};

use tracing::{debug, error};

use panelio_core::traits::{CounterStore, GuildOptionStore, MessageStore, Transport};
use panelio_core::PanelioError;
use panelio_queue::ResourceQueue;
use panelio_registry::{Capability, CapabilityRegistry, Handler, Invocation, ScreenInfo};

/// Process-wide collaborators and the frozen capability registry.
pub struct Context {
    pub transport: Arc<dyn Transport>,
    pub messages: Arc<dyn MessageStore>,
    pub options: Arc<dyn GuildOptionStore>,
    pub counters: Arc<dyn CounterStore>,
    pub queue: Arc<ResourceQueue>,
    /// Version stamped into footers of freshly-built screens.
    pub version: String,
    /// Fallback self-deletion delay for screens without their own default.
    pub default_deletion_hours: Option<u64>,
    /// Upper bound accepted by the mention bulk delete.
    pub bulk_delete_max: usize,
    registry: OnceLock<CapabilityRegistry>,
}

impl Context {
    pub fn new(
        transport: Arc<dyn Transport>,
        messages: Arc<dyn MessageStore>,
        options: Arc<dyn GuildOptionStore>,
        counters: Arc<dyn CounterStore>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            messages,
            options,
            counters,
            queue: Arc::new(ResourceQueue::new()),
            version: version.into(),
            default_deletion_hours: None,
            bulk_delete_max: 50,
            registry: OnceLock::new(),
        }
    }

    /// Process-wide fallback self-deletion delay.
    pub fn with_default_deletion_hours(mut self, hours: Option<u64>) -> Self {
        self.default_deletion_hours = hours;
        self
    }

    /// Upper bound accepted by the mention bulk delete.
    pub fn with_bulk_delete_max(mut self, max: usize) -> Self {
        self.bulk_delete_max = max;
        self
    }

    /// Install the frozen registry. May be called once; later calls fail.
    pub fn install_registry(&self, registry: CapabilityRegistry) -> Result<(), PanelioError> {
        self.registry
            .set(registry)
            .map_err(|_| PanelioError::Internal("registry already installed".into()))
    }

    /// The installed registry, or `None` before startup completes.
    pub fn registry(&self) -> Option<&CapabilityRegistry> {
        self.registry.get()
    }

    /// Handlers for a capability on a screen type; empty before the registry
    /// is installed or when the pair is unregistered (soft failure).
    pub fn handlers_for(&self, capability: Capability, screen_type: &str) -> &[Handler] {
        self.registry
            .get()
            .map(|r| r.lookup(capability, screen_type))
            .unwrap_or(&[])
    }

    /// Whether a capability on a screen type funnels through the queue.
    pub fn requires_serialization(&self, screen_type: &str, capability: Capability) -> bool {
        self.registry
            .get()
            .is_some_and(|r| r.requires_serialization(screen_type, capability))
    }

    /// Static facts about a registered screen.
    pub fn screen(&self, name: &str) -> Option<&ScreenInfo> {
        self.registry.get().and_then(|r| r.screen(name))
    }

    /// Invoke every handler registered for `(capability, screen_type)`.
    ///
    /// When the screen declares the capability as serialized, each handler is
    /// pushed through the resource queue keyed `"{capability}:{document}"` so
    /// concurrent invocations against one document apply in arrival order.
    /// Otherwise handlers run inline.
    ///
    /// Handler failures are logged and do not stop later handlers;
    /// [`PanelioError::LayoutOverflow`] propagates (it signals a programming
    /// defect, and swallowing it would silently corrupt the screen).
    /// Not-found errors propagate as tombstones for the caller to clean up.
    pub async fn dispatch_capability(
        &self,
        capability: Capability,
        screen_type: &str,
        invocation: Invocation,
    ) -> Result<(), PanelioError> {
        let handlers = self.handlers_for(capability, screen_type);
        if handlers.is_empty() {
            debug!(%capability, screen_type, "no handlers registered");
            return Ok(());
        }

        if self.requires_serialization(screen_type, capability) {
            let key = format!("{capability}:{}", invocation.document.id);
            debug!(key = %key, screen_type, "enqueueing serialized handlers");
            for handler in handlers.iter().cloned() {
                let invocation = invocation.clone();
                self.queue
                    .enqueue(&key, Box::pin(async move { handler(invocation).await }))
                    .await?;
            }
            return Ok(());
        }

        for handler in handlers {
            match handler(invocation.clone()).await {
                Ok(()) => {}
                Err(err @ PanelioError::LayoutOverflow { .. }) => return Err(err),
                Err(err) if err.is_tombstone() => return Err(err),
                Err(err) => {
                    error!(%capability, screen_type, error = %err, "handler failed");
                }
            }
        }
        Ok(())
    }
}
