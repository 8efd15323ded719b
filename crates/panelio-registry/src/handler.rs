// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Handler invocations.
//!
//! Registration is coarse (capability tag + screen type only), so every
//! handler receives the full [`Invocation`] and decides applicability itself
//! by inspecting the document and payload.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use panelio_core::error::PanelioError;
use panelio_core::types::{Actor, Button, ChatMessage, Document};

/// The event-specific payload a handler receives.
#[derive(Debug, Clone)]
pub enum Payload {
    /// A dropdown selection; `values` are the selected option labels.
    Menu { values: Vec<String> },
    /// The reserved back-navigation sentinel, delivered to the owning
    /// screen's `MenuSelect` handlers instead of a real selection.
    Back,
    /// A button click; `control` is the clicked button.
    Button { control: Button },
    /// A direct reply to the screen's document.
    Reply { message: ChatMessage },
    /// A message in the thread hanging off the screen's document.
    Thread { message: ChatMessage },
}

impl Payload {
    /// First selected menu value, if this is a real menu selection.
    pub fn selected(&self) -> Option<&str> {
        match self {
            Payload::Menu { values } => values.first().map(String::as_str),
            _ => None,
        }
    }

    /// True for the back-navigation sentinel.
    pub fn is_back(&self) -> bool {
        matches!(self, Payload::Back)
    }
}

/// One handler invocation: the freshly-fetched target document, the acting
/// user, and the event payload.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub document: Document,
    pub actor: Actor,
    pub payload: Payload,
}

/// A registered handler closure.
pub type Handler =
    Arc<dyn Fn(Invocation) -> BoxFuture<'static, Result<(), PanelioError>> + Send + Sync>;

/// Wrap an async function into a [`Handler`].
pub fn handler<F, Fut>(f: F) -> Handler
where
    F: Fn(Invocation) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), PanelioError>> + Send + 'static,
{
    Arc::new(move |invocation| -> BoxFuture<'static, Result<(), PanelioError>> {
        Box::pin(f(invocation))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selected_reads_the_first_menu_value() {
        let payload = Payload::Menu {
            values: vec!["Poll".into(), "Games".into()],
        };
        assert_eq!(payload.selected(), Some("Poll"));
        assert_eq!(Payload::Back.selected(), None);
    }

    #[test]
    fn back_sentinel_is_recognized() {
        assert!(Payload::Back.is_back());
        assert!(!Payload::Menu { values: vec![] }.is_back());
    }
}
