// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Panelio screen engine.
//!
//! Panelio drives persistent, menu-navigable UI screens that live inside
//! editable messages on a chat platform. This crate provides the foundational
//! trait definitions, error type, and common types used throughout the
//! workspace; the transport and storage collaborators implement traits
//! defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::PanelioError;
pub use types::{
    Actor, ChannelId, Document, DocumentId, GuildId, InboundEvent, UserId,
};

// Re-export collaborator traits at crate root.
pub use traits::{CounterStore, GuildOptionStore, MessageStore, Transport};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_has_all_variants() {
        // Verify all 7 error variants exist and can be constructed.
        let _config = PanelioError::Config("test".into());
        let _storage = PanelioError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _transport = PanelioError::Transport {
            message: "test".into(),
            source: None,
        };
        let _not_found = PanelioError::NotFound { what: "test".into() };
        let _overflow = PanelioError::LayoutOverflow {
            slots: 26,
            capacity: 25,
        };
        let _codec = PanelioError::Codec("test".into());
        let _internal = PanelioError::Internal("test".into());
    }

    #[test]
    fn id_newtypes_display_their_inner_string() {
        assert_eq!(DocumentId("d-1".into()).to_string(), "d-1");
        assert_eq!(ChannelId("c-1".into()).to_string(), "c-1");
        assert_eq!(GuildId("g-1".into()).to_string(), "g-1");
        assert_eq!(UserId("u-1".into()).to_string(), "u-1");
    }

    #[test]
    fn all_trait_modules_are_exported() {
        // If any collaborator trait is missing, this test won't compile.
        fn _assert_transport<T: Transport>() {}
        fn _assert_message_store<T: MessageStore>() {}
        fn _assert_option_store<T: GuildOptionStore>() {}
        fn _assert_counter_store<T: CounterStore>() {}
    }
}
