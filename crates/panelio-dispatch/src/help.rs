// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The cross-cutting in-place help rewrite.
//!
//! Every screen carries a `help` control; clicking it rewrites the document
//! into help text for the screen's type without changing the footer, so the
//! `back` control can restore the screen afterwards.

use panelio_codec::{back_button, colors, delete_button, document_screen_type, home_button, ScreenBuilder};
use panelio_core::types::{Actor, Document};
use panelio_core::PanelioError;
use tracing::debug;

use crate::context::Context;
use crate::gate::author_gate;
use crate::menu::MAIN_MENU_TYPE;

const MAIN_MENU_HELP: &str = "Select a command in the main menu,\n\
    then click on the \"help\" button for more info about the command.\n\
    **\nOnly the user who started the menu may navigate it\n**";

/// Rewrite a document into its screen's help text.
pub async fn rewrite_to_help(
    ctx: &Context,
    doc: &Document,
    actor: &Actor,
) -> Result<(), PanelioError> {
    let Some(screen_type) = document_screen_type(doc) else {
        return Ok(());
    };

    // Main-menu help is reserved for the menu's author (or administrators);
    // command help is open to everyone.
    if screen_type == MAIN_MENU_TYPE && !author_gate(ctx, actor, doc).await {
        return Ok(());
    }

    debug!(document = %doc.id, screen = %screen_type, "rewriting to help");

    let (body, controls) = if screen_type == MAIN_MENU_TYPE {
        (
            MAIN_MENU_HELP.to_string(),
            vec![home_button(), delete_button()],
        )
    } else {
        let Some(info) = ctx.screen(&screen_type) else {
            return Ok(());
        };
        let mut body = info.description.to_string();
        if let Some(extra) = &info.help_text {
            body.push_str("\n\n");
            body.push_str(extra);
        }
        (body, vec![back_button(), delete_button()])
    };

    let built = ScreenBuilder::from_document(doc)
        .title("Help")
        .body(body)
        .color(colors::WHITE)
        .controls(controls)
        .build()?;
    ctx.transport.edit_document(&doc.id, built).await
}
