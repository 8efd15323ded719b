// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Panelio screen engine.

use thiserror::Error;

/// The primary error type used across all Panelio traits and core operations.
#[derive(Debug, Error)]
pub enum PanelioError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Transport errors (connection failure, edit rejected, rate limiting).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The referenced document (or other platform resource) no longer exists.
    ///
    /// Treated as a tombstone by the dispatcher: it triggers the same cleanup
    /// as an explicit deletion notification, never logged as a failure.
    #[error("not found: {what}")]
    NotFound { what: String },

    /// A screen declared more interactive controls than one document can hold.
    ///
    /// This is a programming defect rather than a runtime race. It is the one
    /// error the resource queue re-raises to its caller instead of swallowing.
    #[error("control layout overflow: {slots} slots requested, {capacity} available")]
    LayoutOverflow { slots: usize, capacity: usize },

    /// Footer/state codec errors (only raised on encode; decode is total).
    #[error("codec error: {0}")]
    Codec(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PanelioError {
    /// Convenience constructor for transport errors without an underlying source.
    pub fn transport(message: impl Into<String>) -> Self {
        PanelioError::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// True when this error marks a vanished platform resource.
    pub fn is_tombstone(&self) -> bool {
        matches!(self, PanelioError::NotFound { .. })
    }
}
