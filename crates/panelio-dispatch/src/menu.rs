// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The main menu screen.
//!
//! Mentioning the process's user in a channel sends the main menu: a command
//! dropdown plus the cross-cutting help and delete buttons. The `home` button
//! rewrites any screen back into the main menu in place, transferring
//! authorship to the clicking user.

use panelio_codec::{colors, delete_button, help_button, ScreenBuilder};
use panelio_core::types::{
    Actor, ChatMessage, Control, Document, Menu, MenuOption, MessageRecord, NewDocument,
};
use panelio_core::PanelioError;
use tracing::debug;

use crate::context::Context;
use crate::gate::author_gate;

/// Screen type of the main menu, the default state of a fresh document.
pub const MAIN_MENU_TYPE: &str = "MainMenu";

/// Build the main menu write for the given author label.
pub fn build_main_menu(ctx: &Context, author_label: &str) -> Result<NewDocument, PanelioError> {
    let options: Vec<MenuOption> = ctx
        .registry()
        .map(|registry| {
            registry
                .commands()
                .map(|screen| {
                    MenuOption::new(screen.name).with_description(screen.description)
                })
                .collect()
        })
        .unwrap_or_default();

    ScreenBuilder::new(MAIN_MENU_TYPE, &ctx.version)
        .author_label(author_label)
        .color(colors::BLACK)
        .control(Control::Menu(Menu::new("Select a command", options)))
        .control(help_button())
        .control(delete_button())
        .build()
}

/// Send a fresh main menu in response to a mention and persist its record
/// with the mentioning user as author.
pub async fn send_main_menu(ctx: &Context, message: &ChatMessage) -> Result<(), PanelioError> {
    debug!(channel = %message.channel_id, user = %message.author.id, "sending main menu");

    let built = build_main_menu(ctx, &message.author.display_name)?;
    let doc = ctx.transport.send_document(&message.channel_id, built).await?;
    ctx.messages
        .add_message(MessageRecord {
            id: doc.id,
            channel_id: doc.channel_id,
            author_id: Some(message.author.id.clone()),
            kind: None,
            info: Vec::new(),
        })
        .await?;
    Ok(())
}

/// Rewrite a document back into the main menu (`home` control).
///
/// Only the recorded author or an administrator may navigate home; the
/// clicking user becomes the new recorded author.
pub async fn return_home(ctx: &Context, doc: &Document, actor: &Actor) -> Result<(), PanelioError> {
    if !author_gate(ctx, actor, doc).await {
        return Ok(());
    }

    debug!(document = %doc.id, user = %actor.id, "returning to main menu");

    ctx.messages.delete_message(&doc.id).await?;
    let built = build_main_menu(ctx, &actor.display_name)?;
    ctx.transport.edit_document(&doc.id, built).await?;
    ctx.messages
        .add_message(MessageRecord {
            id: doc.id.clone(),
            channel_id: doc.channel_id.clone(),
            author_id: Some(actor.id.clone()),
            kind: None,
            info: Vec::new(),
        })
        .await?;
    Ok(())
}
