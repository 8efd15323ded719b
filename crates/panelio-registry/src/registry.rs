// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The capability registry.
//!
//! Built once at startup from the explicit declarations of every screen,
//! read-only afterwards. Lookups fail softly: an unregistered
//! `(capability, screen type)` pair yields an empty handler list, never an
//! error — unknown state is inert.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use crate::capability::Capability;
use crate::handler::Handler;

/// A screen: one command or game owning a set of capability handlers.
///
/// Implementations declare their handlers explicitly; there is no runtime
/// introspection. Multiple handlers may share a tag — all are tried in
/// declared order, and each decides applicability from the invocation.
pub trait Screen: Send + Sync + 'static {
    /// The screen type tag stamped into document footers.
    fn name(&self) -> &'static str;

    /// One-line description shown in menus and help.
    fn description(&self) -> &'static str;

    /// Accent color of the screen's documents.
    fn color(&self) -> u32;

    /// The capability handlers this screen declares, in dispatch order.
    fn handlers(self: Arc<Self>) -> Vec<(Capability, Handler)>;

    /// Capabilities whose invocations must be serialized per document.
    fn serialized_capabilities(&self) -> HashSet<Capability> {
        HashSet::new()
    }

    /// Whether the cross-cutting delete control requires authorship.
    fn delete_needs_author(&self) -> bool {
        false
    }

    /// Hours after which this screen's documents self-delete, unless a
    /// per-guild option overrides it.
    fn default_deletion_hours(&self) -> Option<u64> {
        None
    }

    /// Extra help text appended below the description in the help rewrite.
    fn help_text(&self) -> Option<String> {
        None
    }

    /// Games are listed in the games menu rather than the main menu.
    fn is_game(&self) -> bool {
        false
    }
}

/// Static facts about a registered screen, indexed by the registry.
#[derive(Clone)]
pub struct ScreenInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub color: u32,
    pub serialized: HashSet<Capability>,
    pub delete_needs_author: bool,
    pub default_deletion_hours: Option<u64>,
    pub help_text: Option<String>,
    pub is_game: bool,
}

/// Builder collecting screen registrations before the registry freezes.
#[derive(Default)]
pub struct RegistryBuilder {
    handlers: HashMap<(Capability, String), Vec<Handler>>,
    screens: Vec<ScreenInfo>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a screen: index its declared handlers under
    /// `(capability, screen type)` and record its static facts.
    pub fn register(mut self, screen: Arc<dyn Screen>) -> Self {
        let info = ScreenInfo {
            name: screen.name(),
            description: screen.description(),
            color: screen.color(),
            serialized: screen.serialized_capabilities(),
            delete_needs_author: screen.delete_needs_author(),
            default_deletion_hours: screen.default_deletion_hours(),
            help_text: screen.help_text(),
            is_game: screen.is_game(),
        };
        debug!(screen = info.name, "registering screen");

        for (capability, handler) in screen.handlers() {
            self.handlers
                .entry((capability, info.name.to_string()))
                .or_default()
                .push(handler);
        }
        self.screens.push(info);
        self
    }

    /// Freeze the registrations into an immutable registry.
    pub fn build(self) -> CapabilityRegistry {
        let by_name = self
            .screens
            .iter()
            .enumerate()
            .map(|(idx, info)| (info.name, idx))
            .collect();
        CapabilityRegistry {
            handlers: self.handlers,
            screens: self.screens,
            by_name,
        }
    }
}

/// Immutable `(capability, screen type) -> handlers` index.
pub struct CapabilityRegistry {
    handlers: HashMap<(Capability, String), Vec<Handler>>,
    screens: Vec<ScreenInfo>,
    by_name: HashMap<&'static str, usize>,
}

impl CapabilityRegistry {
    /// Handlers registered for a capability on a screen type, in declared
    /// order. Empty when unregistered.
    pub fn lookup(&self, capability: Capability, screen_type: &str) -> &[Handler] {
        self.handlers
            .get(&(capability, screen_type.to_owned()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether a capability on a screen type must go through the resource
    /// queue. Unregistered screens never serialize.
    pub fn requires_serialization(&self, screen_type: &str, capability: Capability) -> bool {
        self.screen(screen_type)
            .is_some_and(|info| info.serialized.contains(&capability))
    }

    /// Static facts about a screen type, if registered.
    pub fn screen(&self, name: &str) -> Option<&ScreenInfo> {
        self.by_name.get(name).map(|&idx| &self.screens[idx])
    }

    /// All screens in registration order.
    pub fn screens(&self) -> impl Iterator<Item = &ScreenInfo> {
        self.screens.iter()
    }

    /// Command screens (non-games) in registration order.
    pub fn commands(&self) -> impl Iterator<Item = &ScreenInfo> {
        self.screens.iter().filter(|s| !s.is_game)
    }

    /// Game screens in registration order.
    pub fn games(&self) -> impl Iterator<Item = &ScreenInfo> {
        self.screens.iter().filter(|s| s.is_game)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{handler, Invocation};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Probe {
        calls: Arc<AtomicUsize>,
    }

    impl Screen for Probe {
        fn name(&self) -> &'static str {
            "Probe"
        }

        fn description(&self) -> &'static str {
            "A probe screen"
        }

        fn color(&self) -> u32 {
            0x123456
        }

        fn handlers(self: Arc<Self>) -> Vec<(Capability, Handler)> {
            let first = Arc::clone(&self.calls);
            let second = Arc::clone(&self.calls);
            vec![
                (
                    Capability::ButtonClick,
                    handler(move |_inv: Invocation| {
                        let calls = Arc::clone(&first);
                        async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            Ok(())
                        }
                    }),
                ),
                (
                    Capability::ButtonClick,
                    handler(move |_inv: Invocation| {
                        let calls = Arc::clone(&second);
                        async move {
                            calls.fetch_add(10, Ordering::SeqCst);
                            Ok(())
                        }
                    }),
                ),
            ]
        }

        fn serialized_capabilities(&self) -> HashSet<Capability> {
            [Capability::Reply].into()
        }

        fn is_game(&self) -> bool {
            true
        }
    }

    fn probe_registry() -> (CapabilityRegistry, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let screen = Arc::new(Probe {
            calls: Arc::clone(&calls),
        });
        let registry = RegistryBuilder::new().register(screen).build();
        (registry, calls)
    }

    #[test]
    fn lookup_returns_handlers_in_declared_order() {
        let (registry, _) = probe_registry();
        assert_eq!(registry.lookup(Capability::ButtonClick, "Probe").len(), 2);
    }

    #[test]
    fn lookup_fails_softly_for_unregistered_pairs() {
        let (registry, _) = probe_registry();
        assert!(registry.lookup(Capability::Reply, "Probe").is_empty());
        assert!(registry.lookup(Capability::ButtonClick, "Nothing").is_empty());
    }

    #[test]
    fn serialization_opt_in_is_per_screen_and_capability() {
        let (registry, _) = probe_registry();
        assert!(registry.requires_serialization("Probe", Capability::Reply));
        assert!(!registry.requires_serialization("Probe", Capability::ButtonClick));
        assert!(!registry.requires_serialization("Nothing", Capability::Reply));
    }

    #[test]
    fn screen_facts_are_indexed() {
        let (registry, _) = probe_registry();
        let info = registry.screen("Probe").expect("registered");
        assert_eq!(info.description, "A probe screen");
        assert_eq!(info.color, 0x123456);
        assert!(info.is_game);
        assert!(registry.is_registered("Probe"));
        assert_eq!(registry.games().count(), 1);
        assert_eq!(registry.commands().count(), 0);
    }

    #[tokio::test]
    async fn handlers_are_invocable_through_the_registry() {
        use panelio_core::types::{
            Actor, ChannelId, Document, DocumentId, GuildId,
        };
        let (registry, calls) = probe_registry();
        let invocation = Invocation {
            document: Document {
                id: DocumentId("d".into()),
                channel_id: ChannelId("c".into()),
                guild_id: GuildId("g".into()),
                title: String::new(),
                body: String::new(),
                color: 0,
                content: String::new(),
                controls: vec![],
                footer: None,
                pinned: false,
                from_self: true,
            },
            actor: Actor::member("u", "user"),
            payload: crate::handler::Payload::Back,
        };
        for h in registry.lookup(Capability::ButtonClick, "Probe") {
            h(invocation.clone()).await.unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 11);
    }
}
