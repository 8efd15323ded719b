// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the Panelio workspace.
//!
//! A [`Document`] is the externally-hosted, editable chat message a screen
//! lives in. Documents are transient in-process: they are fetched fresh for
//! every inbound event and never cached between handler invocations — the
//! footer string is the only channel for screen identity between events.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a document (an editable chat message).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a channel (or DM/thread) on the chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub String);

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a guild (server) on the chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuildId(pub String);

impl std::fmt::Display for GuildId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a platform user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The acting user behind an inbound event, with the permission
/// introspection the transport resolved for the event's channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    /// Nickname if set, account name otherwise.
    pub display_name: String,
    /// Role names the user carries in the event's guild.
    pub roles: Vec<String>,
    pub is_admin: bool,
    pub can_manage_messages: bool,
}

impl Actor {
    /// A plain member with no elevated permissions (test convenience).
    pub fn member(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: UserId(id.into()),
            display_name: display_name.into(),
            roles: Vec::new(),
            is_admin: false,
            can_manage_messages: false,
        }
    }
}

/// Visual style of a button control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Success,
    Danger,
}

/// A clickable button on a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Platform-assigned control id, stable across edits of the same control.
    pub id: String,
    pub label: String,
    pub emoji: Option<String>,
    pub style: ButtonStyle,
    pub row: Option<u8>,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            label: label.into(),
            emoji: None,
            style: ButtonStyle::Secondary,
            row: None,
        }
    }

    pub fn emoji(emoji: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            label: String::new(),
            emoji: Some(emoji.into()),
            style: ButtonStyle::Secondary,
            row: None,
        }
    }

    pub fn with_style(mut self, style: ButtonStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_row(mut self, row: u8) -> Self {
        self.row = Some(row);
        self
    }
}

/// A single option in a select menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    pub label: String,
    pub description: Option<String>,
}

impl MenuOption {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A dropdown select menu on a document. Occupies a full control row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub id: String,
    pub placeholder: String,
    pub options: Vec<MenuOption>,
    pub max_values: usize,
    pub row: Option<u8>,
}

impl Menu {
    pub fn new(placeholder: impl Into<String>, options: Vec<MenuOption>) -> Self {
        Self {
            id: String::new(),
            placeholder: placeholder.into(),
            options,
            max_values: 1,
            row: None,
        }
    }

    pub fn with_max_values(mut self, max_values: usize) -> Self {
        self.max_values = max_values;
        self
    }

    pub fn with_row(mut self, row: u8) -> Self {
        self.row = Some(row);
        self
    }
}

/// An interactive control attached to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Button(Button),
    Menu(Menu),
}

impl Control {
    /// Button label, empty for menus.
    pub fn label(&self) -> &str {
        match self {
            Control::Button(b) => &b.label,
            Control::Menu(_) => "",
        }
    }
}

/// A snapshot of an externally-hosted editable message.
///
/// Owned by the chat platform; referenced by id everywhere else. There is no
/// long-lived in-process object for a document beyond one handler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub channel_id: ChannelId,
    pub guild_id: GuildId,
    pub title: String,
    pub body: String,
    pub color: u32,
    /// Plain message content outside the embed (sentinels like `` `Ended` ``).
    pub content: String,
    pub controls: Vec<Control>,
    /// Metadata footer string carrying the encoded screen type.
    pub footer: Option<String>,
    pub pinned: bool,
    /// True when the document was authored by this process's own user.
    pub from_self: bool,
}

impl Document {
    /// Find a button by its platform control id.
    pub fn button_by_id(&self, id: &str) -> Option<&Button> {
        self.controls.iter().find_map(|c| match c {
            Control::Button(b) if b.id == id => Some(b),
            _ => None,
        })
    }

    /// All buttons in control order.
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.controls.iter().filter_map(|c| match c {
            Control::Button(b) => Some(b),
            _ => None,
        })
    }
}

/// The write-side shape of a document for send/edit operations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewDocument {
    pub title: String,
    pub body: String,
    pub color: u32,
    pub content: String,
    pub controls: Vec<Control>,
    pub footer: Option<String>,
}

/// A plain inbound chat message (mention, reply, or thread message).
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: DocumentId,
    pub channel_id: ChannelId,
    pub guild_id: GuildId,
    pub author: Actor,
    pub text: String,
}

/// Severity of a transient channel notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NoticeKind {
    /// Green, informational ("Poll has been ended.").
    Info,
    /// Red, user-correctable problem ("Maximum number of responses reached!").
    Warn,
}

/// A short-lived notice sent to a channel, auto-deleted by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn warn(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warn,
            text: text.into(),
        }
    }
}

/// A typed inbound event delivered by the transport.
///
/// Each variant carries the acting user and the target document id where the
/// platform exposes one; the dispatcher re-fetches the document itself.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    /// The process's user was mentioned in a channel message.
    Mention { message: ChatMessage },
    /// A user replied directly to one of our documents.
    Reply {
        message: ChatMessage,
        target: DocumentId,
    },
    /// A message arrived in a thread hanging off one of our documents.
    ThreadMessage {
        message: ChatMessage,
        parent: DocumentId,
    },
    /// A button on one of our documents was clicked.
    ButtonClick {
        document: DocumentId,
        channel: ChannelId,
        actor: Actor,
        control_id: String,
    },
    /// A menu selection was made on one of our documents.
    MenuSelect {
        document: DocumentId,
        channel: ChannelId,
        actor: Actor,
        values: Vec<String>,
    },
    /// A document was deleted externally (raw platform notification).
    Delete { document: DocumentId },
    /// Several documents were bulk-deleted externally.
    BulkDelete { documents: Vec<DocumentId> },
}

impl InboundEvent {
    /// The target document id, for event kinds that carry one.
    pub fn target(&self) -> Option<&DocumentId> {
        match self {
            InboundEvent::Reply { target, .. } => Some(target),
            InboundEvent::ThreadMessage { parent, .. } => Some(parent),
            InboundEvent::ButtonClick { document, .. }
            | InboundEvent::MenuSelect { document, .. }
            | InboundEvent::Delete { document } => Some(document),
            InboundEvent::Mention { .. } | InboundEvent::BulkDelete { .. } => None,
        }
    }

    /// The channel the event arrived in, when known.
    pub fn channel(&self) -> Option<&ChannelId> {
        match self {
            InboundEvent::Mention { message }
            | InboundEvent::Reply { message, .. }
            | InboundEvent::ThreadMessage { message, .. } => Some(&message.channel_id),
            InboundEvent::ButtonClick { channel, .. }
            | InboundEvent::MenuSelect { channel, .. } => Some(channel),
            InboundEvent::Delete { .. } | InboundEvent::BulkDelete { .. } => None,
        }
    }
}

/// Durable storage shadow of a document's ownership and auxiliary info.
///
/// Survives the document itself; the source of truth for authorship checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub id: DocumentId,
    pub channel_id: ChannelId,
    pub author_id: Option<UserId>,
    /// Owning screen type, when recorded at creation.
    pub kind: Option<String>,
    pub info: Vec<InfoRow>,
}

/// One keyed info row hanging off a message record (vote, token choice,
/// deletion deadline, ...). Deleted with its record (cascade).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoRow {
    pub name: String,
    pub info: Option<String>,
    pub user_id: Option<UserId>,
}

impl InfoRow {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            info: None,
            user_id: None,
        }
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    pub fn with_user(mut self, user: UserId) -> Self {
        self.user_id = Some(user);
        self
    }
}
