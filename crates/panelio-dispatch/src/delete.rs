// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document deletion: the cross-cutting delete control, mention-driven bulk
//! delete, and scheduled self-deletion timers.

use std::time::Duration;

use panelio_codec::{document_screen_type, timefmt};
use panelio_core::types::{Actor, ChatMessage, Document, InfoRow, Notice};
use panelio_core::PanelioError;
use tracing::{debug, warn};

use crate::context::Context;
use crate::gate::author_gate;
use crate::menu::MAIN_MENU_TYPE;

/// Name of the info row holding a document's self-deletion deadline.
pub const DELETION_TIME_INFO: &str = "deletion_time";

/// The screen type owning a document, with any `_ended`-style suffix dropped.
fn base_screen_type(screen_type: &str) -> &str {
    screen_type.split('_').next().unwrap_or(screen_type)
}

/// Handle a click on the cross-cutting delete control.
///
/// Pinned documents are never deleted. Users with manage-messages skip the
/// ownership checks; otherwise the main menu and screens that opt into
/// `delete_needs_author` require the recorded author.
pub async fn handle_delete_control(
    ctx: &Context,
    doc: &Document,
    actor: &Actor,
) -> Result<(), PanelioError> {
    if !actor.can_manage_messages
        && let Some(screen_type) = document_screen_type(doc)
    {
        let base = base_screen_type(&screen_type);
        if base == MAIN_MENU_TYPE && !author_gate(ctx, actor, doc).await {
            return Ok(());
        }
        if ctx.screen(base).is_some_and(|s| s.delete_needs_author)
            && !author_gate(ctx, actor, doc).await
        {
            return Ok(());
        }
    }

    if doc.pinned {
        return Ok(());
    }

    debug!(document = %doc.id, user = %actor.id, "delete control");
    ctx.transport.delete_document(&doc.id, None).await
}

/// Handle a mention of the form `clear N` / `delete N` / `purge N`:
/// bulk-delete up to N of this process's own screen documents from the
/// channel. Administrators only.
pub async fn bulk_delete(
    ctx: &Context,
    message: &ChatMessage,
    count_arg: &str,
) -> Result<(), PanelioError> {
    if !message.author.is_admin {
        return Ok(());
    }

    let count = count_arg.parse::<usize>().ok();
    let count = match count {
        Some(c) if (1..=ctx.bulk_delete_max).contains(&c) => c,
        _ => {
            ctx.transport
                .send_notice(
                    &message.channel_id,
                    Notice::warn(format!(
                        "Can only delete from 1 to {} messages",
                        ctx.bulk_delete_max
                    )),
                )
                .await?;
            return Ok(());
        }
    };

    debug!(channel = %message.channel_id, count, "bulk deleting screens");

    let mut deleted = 0usize;
    for doc in ctx
        .transport
        .recent_documents(&message.channel_id, count)
        .await?
    {
        if !doc.from_self {
            continue;
        }
        let Some(screen_type) = document_screen_type(&doc) else {
            continue;
        };
        let base = base_screen_type(&screen_type);
        if base != MAIN_MENU_TYPE && ctx.screen(base).is_none() {
            continue;
        }
        match ctx.transport.delete_document(&doc.id, None).await {
            Ok(()) => deleted += 1,
            Err(err) if err.is_tombstone() => {
                ctx.messages.delete_message(&doc.id).await?;
            }
            Err(err) => warn!(document = %doc.id, error = %err, "bulk delete failed"),
        }
    }

    debug!(deleted, "bulk delete complete");
    Ok(())
}

/// Attach a self-deletion deadline to a document and schedule the delete
/// with the transport.
///
/// The delay comes from the per-guild `<screen>_deletion` option (hours),
/// falling back to the screen's declared default, then to the process-wide
/// default. Returns the stored deadline, or `None` when no delay applies.
pub async fn schedule_deletion(
    ctx: &Context,
    doc: &Document,
    screen_name: &str,
) -> Result<Option<String>, PanelioError> {
    let option_name = format!("{screen_name}_deletion");
    let configured = match ctx.options.get_option(&doc.guild_id, &option_name).await {
        Ok(values) => values.first().and_then(|v| v.parse::<u64>().ok()),
        Err(err) => {
            warn!(error = %err, option = %option_name, "deletion option unavailable");
            None
        }
    };
    let hours = configured
        .or_else(|| ctx.screen(screen_name).and_then(|s| s.default_deletion_hours))
        .or(ctx.default_deletion_hours);
    let Some(hours) = hours else {
        return Ok(None);
    };

    let delay = Duration::from_secs(hours * 3600);
    let deadline = timefmt::deadline_after(delay);
    ctx.messages
        .add_info(
            &doc.id,
            InfoRow::new(DELETION_TIME_INFO).with_info(deadline.clone()),
        )
        .await?;
    ctx.transport.delete_document(&doc.id, Some(delay)).await?;
    Ok(Some(deadline))
}

/// Re-schedule self-deletion for every stored deadline after a restart.
///
/// Overdue documents are deleted immediately; vanished documents are treated
/// as tombstones and their records cleaned up.
pub async fn restart_deletion_timers(ctx: &Context) -> Result<(), PanelioError> {
    let deleting = ctx
        .messages
        .messages_with_info_named(DELETION_TIME_INFO)
        .await?;
    debug!(count = deleting.len(), "restarting deletion timers");

    for (record, row) in deleting {
        let Some(deadline) = row.info else {
            continue;
        };
        let delay = match timefmt::seconds_until(&deadline) {
            Some(remaining) if remaining > 0 => Some(Duration::from_secs(remaining as u64)),
            _ => None,
        };
        match ctx.transport.delete_document(&record.id, delay).await {
            Ok(()) => {}
            Err(err) if err.is_tombstone() => {
                ctx.messages.delete_message(&record.id).await?;
            }
            Err(err) => {
                warn!(document = %record.id, error = %err, "timer restart failed");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_screen_type_strips_suffixes() {
        assert_eq!(base_screen_type("ConnectFour_ended"), "ConnectFour");
        assert_eq!(base_screen_type("Hangman_word"), "Hangman");
        assert_eq!(base_screen_type("Poll"), "Poll");
    }
}
