// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for Panelio's external collaborators.

pub mod store;
pub mod transport;

pub use store::{increment_counter, CounterStore, GuildOptionStore, MessageStore};
pub use transport::Transport;
