// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability tags — the kinds of event a screen handler responds to.

use strum::{Display, EnumIter, EnumString};

/// The kind of inbound event a handler is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum Capability {
    /// A dropdown selection on the screen (also carries the back sentinel).
    MenuSelect,
    /// A button click on the screen.
    ButtonClick,
    /// A direct reply to the screen's document.
    Reply,
    /// A message in the thread hanging off the screen's document.
    Thread,
    /// The in-place help rewrite for the screen.
    Help,
}
