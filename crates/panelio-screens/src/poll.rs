// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The poll command screen.
//!
//! A poll's full state lives in the document and its info rows: each
//! response is a button whose label packs the vote count, the response name,
//! and a token bar into a fixed-width string; each vote is an info row keyed
//! by response name. Poll management happens through replies (`question …`,
//! `remove N`, `fix`, `end`, or a bare response to add), many at once
//! separated by `;`.
//!
//! `Reply` and `ButtonClick` are serialized: rapid votes and edits against
//! one poll are read-modify-write races without the queue.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use panelio_codec::{
    colors, delete_button, document_screen_type, help_button, home_button, ScreenBuilder,
};
use panelio_core::types::{
    Button, ButtonStyle, ChannelId, Control, Document, DocumentId, InfoRow, Menu, MenuOption,
    Notice,
};
use panelio_core::PanelioError;
use panelio_dispatch::delete::schedule_deletion;
use panelio_dispatch::{Context, Gate, MAIN_MENU_TYPE};
use panelio_registry::{handler, Capability, Handler, Invocation, Payload, Screen};

const SCREEN: &str = "Poll";
const DESCRIPTION: &str = "Create a poll for users to vote on.";
const TOKENS: [&str; 2] = ["\u{26AA}", "\u{26AB}"]; // ⚪ ⚫

/// Sentinel content of a poll that accepts no more response changes.
const FIXED: &str = "`Fixed`";
/// Sentinel content of an ended poll.
const ENDED: &str = "`Ended`";

/// Full packed width of a response label, in characters.
const LABEL_WIDTH: usize = 80;
const NAME_FIELD: usize = 25;
const MAX_RESPONSE_LEN: usize = 25;
const MAX_QUESTION_LEN: usize = 60;

/// Pack a response name, its vote count, and a token bar into a
/// fixed-width button label. Byte-stable: stored documents carry it.
pub fn format_response_label(name: &str, count: usize, token: &str) -> String {
    let centered = center(name, 15);
    let padded = pad_right(&centered, NAME_FIELD);
    let mut label = format!("({count})\u{3000}{padded}\u{3000}");
    let used = label.chars().count();
    if count > LABEL_WIDTH.saturating_sub(used) {
        label.push_str(&token.repeat(LABEL_WIDTH - 1 - used));
        label.push('\u{2026}');
    } else {
        label.push_str(&token.repeat(count));
    }
    let used = label.chars().count();
    label.push_str(&"\u{3000}".repeat(LABEL_WIDTH.saturating_sub(used)));
    label
}

/// Recover the response name from a packed label.
pub fn response_name(label: &str) -> String {
    label
        .split('\u{3000}')
        .nth(1)
        .unwrap_or("")
        .trim()
        .to_string()
}

/// Recover the vote count from a packed label.
fn response_count(label: &str) -> usize {
    label
        .split('\u{3000}')
        .next()
        .and_then(|head| head.strip_prefix('('))
        .and_then(|head| head.strip_suffix(')'))
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let margin = width - len;
    let left = margin / 2;
    format!(
        "{}{}{}",
        "\u{2000}".repeat(left),
        text,
        "\u{2000}".repeat(margin - left)
    )
}

fn pad_right(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    format!("{}{}", text, "\u{2000}".repeat(width - len))
}

pub struct Poll {
    ctx: Arc<Context>,
}

impl Poll {
    pub fn new(ctx: Arc<Context>) -> Arc<Self> {
        Arc::new(Self { ctx })
    }

    /// A live poll: not the poll menu, not a help rewrite, not ended
    /// (unless `allow_ended`), not fixed (when `check_fixed`).
    fn valid_poll(doc: &Document, check_fixed: bool, allow_ended: bool) -> bool {
        (doc.content != ENDED || allow_ended)
            && doc.title != "Help"
            && doc.title != DESCRIPTION
            && (!check_fixed || doc.content != FIXED)
    }

    /// The poll's response buttons in display order.
    fn response_buttons(doc: &Document) -> Vec<Button> {
        doc.buttons().cloned().collect()
    }

    /// Dropdown listing every response, for vote details.
    fn info_menu(buttons: &[Button]) -> Option<Control> {
        if buttons.is_empty() {
            return None;
        }
        let options = buttons
            .iter()
            .map(|b| MenuOption::new(response_name(&b.label)))
            .collect();
        Some(Control::Menu(
            Menu::new("Responses info", options).with_row(4),
        ))
    }

    fn response_controls(buttons: Vec<Button>, with_menu: bool) -> Vec<Control> {
        let menu = if with_menu {
            Self::info_menu(&buttons)
        } else {
            None
        };
        let mut controls: Vec<Control> = buttons
            .into_iter()
            .enumerate()
            .map(|(idx, mut b)| {
                b.row = Some((idx / 4) as u8);
                Control::Button(b)
            })
            .collect();
        controls.extend(menu);
        controls
    }

    async fn warn(&self, channel: &ChannelId, text: &str) -> Result<(), PanelioError> {
        self.ctx.transport.send_notice(channel, Notice::warn(text)).await
    }

    async fn notify(&self, channel: &ChannelId, text: &str) -> Result<(), PanelioError> {
        self.ctx.transport.send_notice(channel, Notice::info(text)).await
    }

    /// Route a menu selection: open the poll menu from the main menu or the
    /// back control, otherwise show vote details for a selected response.
    async fn route_select(&self, inv: Invocation) -> Result<(), PanelioError> {
        let doc_type = document_screen_type(&inv.document);
        match &inv.payload {
            Payload::Back => self.open_poll_menu(inv.clone()).await,
            Payload::Menu { .. } if doc_type.as_deref() == Some(MAIN_MENU_TYPE) => {
                if inv.payload.selected() == Some(SCREEN) {
                    self.open_poll_menu(inv.clone()).await
                } else {
                    Ok(())
                }
            }
            Payload::Menu { values } => {
                // A selection on a poll document itself: vote details.
                if Self::valid_poll(&inv.document, false, true)
                    && let Some(name) = values.first()
                {
                    self.show_response_info(&inv, name).await
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    /// Edit the document into the poll main menu.
    async fn open_poll_menu(&self, inv: Invocation) -> Result<(), PanelioError> {
        let doc = &inv.document;
        if !Gate::roles_and_author()
            .check(&self.ctx, &inv.actor, doc, SCREEN)
            .await
        {
            return Ok(());
        }

        debug!(document = %doc.id, "poll main menu");

        let built = ScreenBuilder::new(SCREEN, &self.ctx.version)
            .author_label(&inv.actor.display_name)
            .title(DESCRIPTION)
            .color(self.color())
            .control(Control::Button(Button::new("New poll")))
            .control(home_button())
            .control(help_button())
            .control(delete_button())
            .build()?;
        self.ctx.transport.edit_document(&doc.id, built).await
    }

    /// Route a button click: "New poll" on the menu, otherwise a vote.
    async fn route_button(&self, inv: Invocation) -> Result<(), PanelioError> {
        let Payload::Button { control } = &inv.payload else {
            return Ok(());
        };
        if control.label == "New poll" && inv.document.title == DESCRIPTION {
            self.start_new_poll(&inv).await
        } else if Self::valid_poll(&inv.document, false, false) {
            self.toggle_vote(&inv).await
        } else {
            Ok(())
        }
    }

    /// Rewrite the poll menu into an empty poll awaiting replies.
    async fn start_new_poll(&self, inv: &Invocation) -> Result<(), PanelioError> {
        let doc = &inv.document;
        if !Gate::roles_and_author()
            .check(&self.ctx, &inv.actor, doc, SCREEN)
            .await
        {
            return Ok(());
        }

        debug!(document = %doc.id, "new poll");

        let built = ScreenBuilder::new(SCREEN, &self.ctx.version)
            .title("New poll")
            .body(self.usage_text())
            .color(colors::random_color())
            .build()?;
        self.ctx.transport.edit_document(&doc.id, built).await?;

        // An open poll belongs to everyone: votes need no authorship.
        self.ctx.messages.update_author(&doc.id, None).await?;
        let doc = self
            .ctx
            .transport
            .fetch_document(&doc.channel_id, &doc.id)
            .await?;
        schedule_deletion(&self.ctx, &doc, SCREEN).await?;
        Ok(())
    }

    /// Add or retract the acting user's vote on a response button.
    async fn toggle_vote(&self, inv: &Invocation) -> Result<(), PanelioError> {
        let Payload::Button { control } = &inv.payload else {
            return Ok(());
        };
        // Re-fetch: this handler runs behind the queue and the snapshot in
        // the invocation may predate earlier queued votes.
        let doc = self
            .ctx
            .transport
            .fetch_document(&inv.document.channel_id, &inv.document.id)
            .await?;
        if !Self::valid_poll(&doc, false, false) {
            return Ok(());
        }

        let name = response_name(&control.label);
        let votes = self
            .ctx
            .messages
            .get_info(&doc.id, Some(&name), None)
            .await?;
        let adding = votes.iter().all(|row| row.user_id.as_ref() != Some(&inv.actor.id));
        let count = if adding { votes.len() + 1 } else { votes.len() - 1 };

        debug!(document = %doc.id, user = %inv.actor.id, response = %name, adding, "poll vote");

        let buttons: Vec<Button> = Self::response_buttons(&doc)
            .into_iter()
            .enumerate()
            .map(|(idx, mut b)| {
                if response_name(&b.label) == name {
                    b.label = format_response_label(&name, count, TOKENS[idx % TOKENS.len()]);
                }
                b
            })
            .collect();

        let built = ScreenBuilder::from_document(&doc)
            .controls(Self::response_controls(buttons, true))
            .build()?;
        self.ctx.transport.edit_document(&doc.id, built).await?;

        if adding {
            self.ctx
                .messages
                .add_info(&doc.id, InfoRow::new(&name).with_user(inv.actor.id.clone()))
                .await?;
        } else {
            self.ctx
                .messages
                .delete_info(&doc.id, &name, Some(&inv.actor.id))
                .await?;
        }
        Ok(())
    }

    /// Vote details for one response, as a transient channel notice.
    async fn show_response_info(&self, inv: &Invocation, name: &str) -> Result<(), PanelioError> {
        let doc = &inv.document;
        let votes = self.ctx.messages.get_info(&doc.id, Some(name), None).await?;
        if votes.is_empty() {
            return Ok(());
        }

        debug!(document = %doc.id, response = name, "response info");

        let mut voters = Vec::new();
        for row in &votes {
            let Some(user) = &row.user_id else { continue };
            if let Some(actor) = self.ctx.transport.resolve_member(&doc.guild_id, user).await {
                voters.push(actor.display_name);
            }
        }
        self.notify(
            &doc.channel_id,
            &format!("{name}: {} votes\n{}", votes.len(), voters.join("\n")),
        )
        .await
    }

    /// Apply a management reply to the poll. Runs behind the queue.
    async fn manage_poll(&self, inv: Invocation) -> Result<(), PanelioError> {
        if !Gate::roles()
            .check(&self.ctx, &inv.actor, &inv.document, SCREEN)
            .await
        {
            return Ok(());
        }
        let Payload::Reply { message } = &inv.payload else {
            return Ok(());
        };
        let text = message.text.trim();
        if text.is_empty() || !Self::valid_poll(&inv.document, false, false) {
            return Ok(());
        }

        debug!(document = %inv.document.id, "poll management reply");

        match self
            .apply_options(&inv.document.channel_id, &inv.document.id, text)
            .await
        {
            Err(PanelioError::LayoutOverflow { .. }) => {
                // One document cannot hold more response buttons.
                self.warn(
                    &inv.document.channel_id,
                    "Maximum number of responses reached!",
                )
                .await
            }
            other => other,
        }
    }

    /// Parse and apply `;`-separated options: `question …`, `remove N`,
    /// `fix`, `end`, anything else adds a response. The document is
    /// re-fetched between operations since each one edits it.
    async fn apply_options(
        &self,
        channel: &ChannelId,
        poll: &DocumentId,
        options: &str,
    ) -> Result<(), PanelioError> {
        let ending = options.split(';').any(|o| o.trim().eq_ignore_ascii_case("end"));
        let doc = self.ctx.transport.fetch_document(channel, poll).await?;
        if !Self::valid_poll(&doc, !ending, false) {
            return Ok(());
        }

        let mut question = None;
        let mut removals = Vec::new();
        let mut fix = false;
        let mut end = false;
        let mut responses = Vec::new();
        for raw in options.split(';') {
            let option = raw.trim();
            if option.is_empty() {
                continue;
            }
            let lower = option.to_lowercase();
            if let Some(q) = option
                .strip_prefix("question ")
                .or_else(|| option.strip_prefix("Question "))
            {
                question = Some(q.trim().to_string());
            } else if lower == "fix" {
                fix = true;
            } else if lower == "end" {
                end = true;
            } else if let Some(idx) = lower.strip_prefix("remove ") {
                removals.push(idx.trim().to_string());
            } else {
                responses.push(option.to_string());
            }
        }

        if responses.iter().any(|r| r.chars().count() > MAX_RESPONSE_LEN) {
            self.warn(channel, "Cannot add responses longer than 25 characters.")
                .await?;
            responses.retain(|r| r.chars().count() <= MAX_RESPONSE_LEN);
        }

        if let Some(question) = question {
            self.change_question(channel, poll, &question).await?;
        }
        if !responses.is_empty() {
            self.add_responses(channel, poll, &responses).await?;
        }
        if !removals.is_empty() {
            self.remove_responses(channel, poll, &removals).await?;
        }
        if fix {
            self.fix_poll(channel, poll).await?;
        }
        if end {
            self.end_poll(channel, poll).await?;
        }
        Ok(())
    }

    async fn change_question(
        &self,
        channel: &ChannelId,
        poll: &DocumentId,
        question: &str,
    ) -> Result<(), PanelioError> {
        if question.chars().count() >= MAX_QUESTION_LEN {
            return self
                .warn(channel, "Can only add question shorter than 60 characters!")
                .await;
        }
        if question == DESCRIPTION {
            return self.warn(channel, "Invalid question").await;
        }
        let doc = self.ctx.transport.fetch_document(channel, poll).await?;

        debug!(document = %poll, "poll question changed");

        let built = ScreenBuilder::from_document(&doc)
            .title(question)
            .controls(doc.controls.clone())
            .build()?;
        self.ctx.transport.edit_document(poll, built).await
    }

    async fn add_responses(
        &self,
        channel: &ChannelId,
        poll: &DocumentId,
        responses: &[String],
    ) -> Result<(), PanelioError> {
        let doc = self.ctx.transport.fetch_document(channel, poll).await?;
        let mut buttons = Self::response_buttons(&doc);
        let existing: HashSet<String> =
            buttons.iter().map(|b| response_name(&b.label)).collect();

        debug!(document = %poll, count = responses.len(), "adding poll responses");

        for response in responses {
            let response = response.replace('"', "'");
            let response = response.split_whitespace().collect::<Vec<_>>().join(" ");
            if response == "New poll" {
                return self.warn(channel, "Invalid response").await;
            }
            if existing.contains(&response) {
                continue;
            }
            buttons.push(Button::new(format_response_label(&response, 0, TOKENS[0])));
        }

        // A fresh poll still shows the usage text; the first response
        // replaces it.
        let built = ScreenBuilder::from_document(&doc)
            .body("")
            .controls(Self::response_controls(buttons, false))
            .build()?;
        self.ctx.transport.edit_document(poll, built).await
    }

    async fn remove_responses(
        &self,
        channel: &ChannelId,
        poll: &DocumentId,
        removals: &[String],
    ) -> Result<(), PanelioError> {
        let doc = self.ctx.transport.fetch_document(channel, poll).await?;
        let buttons = Self::response_buttons(&doc);

        let indexes: Option<Vec<usize>> = removals.iter().map(|r| r.parse().ok()).collect();
        let indexes = match indexes {
            Some(idx) if idx.iter().all(|&i| i < buttons.len()) => idx,
            _ => {
                if buttons.is_empty() {
                    return self.warn(channel, "There are no responses in the poll!").await;
                }
                return self
                    .warn(
                        channel,
                        &format!(
                            "Responses can only be removed by indexes from `0` to `{}`",
                            buttons.len() - 1
                        ),
                    )
                    .await;
            }
        };

        let mut removed = Vec::new();
        let remaining: Vec<Button> = buttons
            .into_iter()
            .enumerate()
            .filter_map(|(idx, b)| {
                if indexes.contains(&idx) {
                    removed.push(response_name(&b.label));
                    None
                } else {
                    Some(b)
                }
            })
            .collect();

        debug!(document = %poll, removed = removed.len(), "removing poll responses");

        let built = ScreenBuilder::from_document(&doc)
            .controls(Self::response_controls(remaining, true))
            .build()?;
        self.ctx.transport.edit_document(poll, built).await?;

        if !removed.is_empty() {
            self.notify(channel, &format!("Removed: `{}`", removed.join(", ")))
                .await?;
        }
        Ok(())
    }

    /// Freeze the response list; votes stay open.
    async fn fix_poll(&self, channel: &ChannelId, poll: &DocumentId) -> Result<(), PanelioError> {
        let doc = self.ctx.transport.fetch_document(channel, poll).await?;

        debug!(document = %poll, "poll fixed");

        let built = ScreenBuilder::from_document(&doc)
            .content(FIXED)
            .controls(doc.controls.clone())
            .build()?;
        self.ctx.transport.edit_document(poll, built).await?;
        self.notify(channel, "No more responses can be added or removed.")
            .await
    }

    /// Close the poll and highlight the leading responses.
    async fn end_poll(&self, channel: &ChannelId, poll: &DocumentId) -> Result<(), PanelioError> {
        let doc = self.ctx.transport.fetch_document(channel, poll).await?;
        let buttons = Self::response_buttons(&doc);

        let max_votes = buttons.iter().map(|b| response_count(&b.label)).max().unwrap_or(0);
        let buttons: Vec<Button> = buttons
            .into_iter()
            .map(|mut b| {
                if max_votes > 0 && response_count(&b.label) == max_votes {
                    b.style = ButtonStyle::Primary;
                }
                b
            })
            .collect();

        debug!(document = %poll, max_votes, "poll ended");

        let built = ScreenBuilder::from_document(&doc)
            .content(ENDED)
            .controls(Self::response_controls(buttons, true))
            .build()?;
        self.ctx.transport.edit_document(poll, built).await?;
        self.notify(channel, "Poll has been ended.").await
    }

    fn usage_text(&self) -> String {
        [
            "* Reply `question <new_question>` to change the question.",
            "* Reply `<response>` to add a response.",
            "* Reply `remove <idx>` to remove a response by index.",
            "* Reply `fix` to disable further adding or removing responses.",
            "* Reply `end` to close the poll.",
            "* Multiple options can be added at once, separated with `;`\n(example: `response1; remove 0; response2`)",
        ]
        .join("\n")
    }
}

impl Screen for Poll {
    fn name(&self) -> &'static str {
        SCREEN
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn color(&self) -> u32 {
        colors::GREEN
    }

    fn serialized_capabilities(&self) -> HashSet<Capability> {
        [Capability::Reply, Capability::ButtonClick].into()
    }

    fn default_deletion_hours(&self) -> Option<u64> {
        Some(720)
    }

    fn help_text(&self) -> Option<String> {
        Some(format!(
            "{}\n\n* Poll message will be automatically deleted after a month.",
            self.usage_text()
        ))
    }

    fn handlers(self: Arc<Self>) -> Vec<(Capability, Handler)> {
        let select = Arc::clone(&self);
        let button = Arc::clone(&self);
        let reply = self;
        vec![
            (
                Capability::MenuSelect,
                handler(move |inv| {
                    let screen = Arc::clone(&select);
                    async move { screen.route_select(inv).await }
                }),
            ),
            (
                Capability::ButtonClick,
                handler(move |inv| {
                    let screen = Arc::clone(&button);
                    async move { screen.route_button(inv).await }
                }),
            ),
            (
                Capability::Reply,
                handler(move |inv| {
                    let screen = Arc::clone(&reply);
                    async move { screen.manage_poll(inv).await }
                }),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_round_trips_the_response_name() {
        for name in ["yes", "a much longer response!", "x"] {
            for count in [0usize, 1, 7, 40] {
                let label = format_response_label(name, count, TOKENS[0]);
                assert_eq!(response_name(&label), name, "name {name:?} count {count}");
                assert_eq!(response_count(&label), count);
            }
        }
    }

    #[test]
    fn label_is_fixed_width_for_small_counts() {
        let a = format_response_label("yes", 0, TOKENS[0]);
        let b = format_response_label("a longer one", 12, TOKENS[1]);
        assert_eq!(a.chars().count(), LABEL_WIDTH);
        assert_eq!(b.chars().count(), LABEL_WIDTH);
    }

    #[test]
    fn huge_counts_truncate_with_ellipsis() {
        let label = format_response_label("yes", 500, TOKENS[0]);
        assert_eq!(label.chars().count(), LABEL_WIDTH);
        assert!(label.contains('\u{2026}'));
        assert_eq!(response_name(&label), "yes");
    }
}
