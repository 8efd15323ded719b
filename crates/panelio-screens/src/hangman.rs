// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The hangman game screen.
//!
//! Starting the game asks the initiating user for a word over direct
//! message; their reply spawns the game document in the original channel
//! with a thread for guesses. The guessed-letter set and the wrong-guess
//! phase are derived from the document body on every guess — the word itself
//! is the only stored secret (an info row).
//!
//! `Thread` is serialized: guesses arriving together must merge in arrival
//! order, not race each other's read-modify-write.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use tracing::debug;

use panelio_codec::{colors, delete_button, document_screen_type, ScreenBuilder};
use panelio_core::traits::increment_counter;
use panelio_core::types::{ChannelId, Document, InfoRow, MessageRecord, Notice, UserId};
use panelio_core::PanelioError;
use panelio_dispatch::delete::schedule_deletion;
use panelio_dispatch::Context;
use panelio_registry::{handler, Capability, Handler, Invocation, Payload, Screen};

const SCREEN: &str = "Hangman";
/// The DM document after its word was accepted.
const WORD_TAKEN: &str = "Hangman_word";
const ENDED: &str = "Hangman_ended";
const WINS_COUNTER: &str = "Hangman_wins";
const WORD_INFO: &str = "hangman_word";

const MAX_WORD_LEN: usize = 40;
const MAX_WRONG: usize = 7;

const GUESS_HINT: &str = "Guess the word in this message's **thread!**";

pub struct Hangman {
    ctx: Arc<Context>,
}

/// Derived game state, parsed from and rendered into the document body.
#[derive(Debug, Clone, PartialEq, Eq)]
struct GameState {
    guessed: BTreeSet<char>,
    wrong: usize,
}

impl GameState {
    fn new() -> Self {
        Self {
            guessed: BTreeSet::new(),
            wrong: 0,
        }
    }

    /// Parse the state lines out of a game body; `None` when absent.
    fn parse(body: &str) -> Option<Self> {
        let mut wrong = None;
        let mut guessed = BTreeSet::new();
        for line in body.lines() {
            if let Some(rest) = line.strip_prefix("Wrong guesses: ") {
                wrong = rest.split('/').next()?.parse().ok();
            } else if let Some(rest) = line.strip_prefix("Guessed letters: ") {
                guessed = rest
                    .split(", ")
                    .filter_map(|s| s.trim().chars().next())
                    .filter(char::is_ascii_uppercase)
                    .collect();
            }
        }
        Some(Self {
            guessed,
            wrong: wrong?,
        })
    }

    fn guessed_line(&self) -> String {
        let letters: Vec<String> = self.guessed.iter().map(char::to_string).collect();
        format!("Guessed letters: {}", letters.join(", "))
    }

    /// Render the state header plus the gallows picture.
    fn render(&self) -> String {
        format!(
            "Wrong guesses: {}/{MAX_WRONG}\n{}\n{}",
            self.wrong.min(MAX_WRONG),
            self.guessed_line(),
            gallows(self.wrong)
        )
    }
}

/// The gallows picture for a wrong-guess phase (0..=7).
fn gallows(phase: usize) -> String {
    let head = if phase >= 2 { "O" } else { " " };
    let arms = match phase {
        0..=2 => "   ",
        3 => " | ",
        4 => "/| ",
        _ => "/|\\",
    };
    let legs = match phase {
        0..=5 => "   ",
        6 => "/  ",
        _ => "/ \\",
    };
    let rope = if phase >= 1 { "|" } else { " " };
    format!(
        " _______\n |/    {rope}\n |     {head}\n |    {arms}\n |    {legs}\n_|_"
    )
}

/// Hide the unguessed letters of a word behind `\_` markers.
fn hide_word(word: &str, guessed: &BTreeSet<char>) -> String {
    let spaced: Vec<String> = word
        .split_whitespace()
        .map(|part| {
            part.chars()
                .map(|c| {
                    if c.is_ascii_uppercase() && !guessed.contains(&c) {
                        "\\_".to_string()
                    } else {
                        c.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    spaced.join("\u{3000}")
}

impl Hangman {
    pub fn new(ctx: Arc<Context>) -> Arc<Self> {
        Arc::new(Self { ctx })
    }

    async fn display_name(&self, doc: &Document, user: &UserId) -> String {
        self.ctx
            .transport
            .resolve_member(&doc.guild_id, user)
            .await
            .map(|a| a.display_name)
            .unwrap_or_else(|| user.to_string())
    }

    /// Ask the selecting user for a word over DM.
    async fn offer_dm(&self, inv: Invocation) -> Result<(), PanelioError> {
        let origin = document_screen_type(&inv.document);
        if inv.payload.selected() != Some(SCREEN) || origin.as_deref() != Some("Games") {
            return Ok(());
        }

        debug!(user = %inv.actor.id, "hangman word request");

        let dm = ScreenBuilder::new(SCREEN, &self.ctx.version)
            .title(format!("{SCREEN} game in {}", inv.document.guild_id))
            .color(self.color())
            .body(format!(
                "Reply with a hangman word!\nChannel: {}",
                inv.document.channel_id
            ))
            .build()?;
        self.ctx.transport.send_direct(&inv.actor.id, dm).await?;
        self.ctx
            .transport
            .send_notice(
                &inv.document.channel_id,
                Notice::info("You have received a private message!"),
            )
            .await
    }

    /// Handle the word reply in the DM and spawn the game in the channel.
    async fn start_from_dm(&self, inv: Invocation) -> Result<(), PanelioError> {
        let dm_doc = &inv.document;
        let Payload::Reply { message } = &inv.payload else {
            return Ok(());
        };
        let Some(channel) = dm_doc
            .body
            .lines()
            .find_map(|l| l.strip_prefix("Channel: "))
        else {
            return Ok(());
        };
        let channel = ChannelId(channel.trim().to_string());

        let word = message
            .text
            .trim()
            .to_uppercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if word.chars().count() > MAX_WORD_LEN {
            return self
                .ctx
                .transport
                .send_notice(
                    &dm_doc.channel_id,
                    Notice::warn("Hangman word cannot be longer than 40 characters."),
                )
                .await;
        }
        if !word.chars().any(|c| c.is_ascii_uppercase()) {
            return self
                .ctx
                .transport
                .send_notice(
                    &dm_doc.channel_id,
                    Notice::warn(
                        "Hangman word must include at least 1 ASCII character from a to Z (case insensitive)",
                    ),
                )
                .await;
        }

        // Mark the DM consumed so a second reply cannot start another game.
        let consumed = ScreenBuilder::from_document(dm_doc)
            .retype(WORD_TAKEN, &self.ctx.version)
            .body(word.clone())
            .build()?;
        self.ctx.transport.edit_document(&dm_doc.id, consumed).await?;

        let state = GameState::new();
        let built = ScreenBuilder::new(SCREEN, &self.ctx.version)
            .author_label(&inv.actor.display_name)
            .title(hide_word(&word, &state.guessed))
            .body(format!("{}\n\n{GUESS_HINT}", state.render()))
            .color(colors::random_color())
            .build()?;
        let game = self.ctx.transport.send_document(&channel, built).await?;

        self.ctx
            .messages
            .add_message(MessageRecord {
                id: game.id.clone(),
                channel_id: game.channel_id.clone(),
                author_id: Some(inv.actor.id.clone()),
                kind: Some(SCREEN.into()),
                info: vec![InfoRow::new(WORD_INFO)
                    .with_info(word)
                    .with_user(inv.actor.id.clone())],
            })
            .await?;
        self.ctx.transport.create_thread(&game.id, "Hangman!").await?;
        schedule_deletion(&self.ctx, &game, SCREEN).await?;

        debug!(channel = %channel, user = %inv.actor.id, "hangman started");
        Ok(())
    }

    /// Merge guessed letters from a thread message. Runs behind the queue,
    /// so concurrent guesses apply in arrival order.
    async fn guess(&self, inv: Invocation) -> Result<(), PanelioError> {
        let Payload::Thread { message } = &inv.payload else {
            return Ok(());
        };

        // One or more single A-Z letters, whitespace separated.
        let letters: HashSet<char> = message
            .text
            .split_whitespace()
            .filter_map(|token| {
                let mut chars = token.chars();
                let c = chars.next()?.to_ascii_uppercase();
                (chars.next().is_none() && c.is_ascii_uppercase()).then_some(c)
            })
            .collect();
        if letters.is_empty() {
            return Ok(());
        }

        let word_rows = self
            .ctx
            .messages
            .get_info(&inv.document.id, Some(WORD_INFO), None)
            .await?;
        let Some(word_row) = word_rows.first() else {
            // The game lost its word: tombstone the record.
            self.ctx.messages.delete_message(&inv.document.id).await?;
            return Ok(());
        };
        let Some(word) = word_row.info.clone() else {
            return Ok(());
        };
        let setter = word_row.user_id.clone();

        // Re-fetch: earlier queued guesses may have edited the document
        // after this invocation's snapshot was taken.
        let doc = self
            .ctx
            .transport
            .fetch_document(&inv.document.channel_id, &inv.document.id)
            .await?;
        let Some(mut state) = GameState::parse(&doc.body) else {
            return Ok(());
        };

        let fresh: Vec<char> = letters
            .iter()
            .copied()
            .filter(|c| !state.guessed.contains(c))
            .collect();
        state.guessed.extend(fresh.iter().copied());
        state.wrong += fresh.iter().filter(|c| !word.contains(**c)).count();

        debug!(
            document = %doc.id,
            user = %inv.actor.id,
            wrong = state.wrong,
            "hangman guess"
        );

        let hidden = hide_word(&word, &state.guessed);
        if !hidden.contains("\\_") {
            // Every letter found: the guesser wins.
            return self
                .finish(&doc, &word, &state, inv.actor.id.clone())
                .await;
        }
        if state.wrong >= MAX_WRONG {
            // Out of guesses: the word setter wins.
            let Some(setter) = setter else { return Ok(()) };
            return self.finish(&doc, &word, &state, setter).await;
        }

        let built = ScreenBuilder::from_document(&doc)
            .title(hidden)
            .body(format!("{}\n\n{GUESS_HINT}", state.render()))
            .build()?;
        self.ctx.transport.edit_document(&doc.id, built).await
    }

    /// Rewrite the game into its ended screen and record the winner.
    async fn finish(
        &self,
        doc: &Document,
        word: &str,
        state: &GameState,
        winner: UserId,
    ) -> Result<(), PanelioError> {
        let name = self.display_name(doc, &winner).await;
        let wins = increment_counter(
            self.ctx.counters.as_ref(),
            &winner,
            &doc.guild_id,
            WINS_COUNTER,
        )
        .await?;
        self.ctx
            .messages
            .update_author(&doc.id, Some(&winner))
            .await?;

        debug!(document = %doc.id, winner = %winner, wins, "hangman ended");

        let possessive = if name.ends_with('s') {
            format!("**{name}**'")
        } else {
            format!("**{name}**'s")
        };
        let built = ScreenBuilder::new(ENDED, &self.ctx.version)
            .author_label(name.clone())
            .title(word)
            .body(format!(
                "**{name}** wins!\n\n{}\n\n{possessive} total wins: {wins}",
                state.render()
            ))
            .color(self.color())
            .control(delete_button())
            .build()?;
        self.ctx.transport.edit_document(&doc.id, built).await?;

        self.ctx
            .transport
            .send_notice(&doc.channel_id, Notice::info(format!("Game ended! ({word})")))
            .await?;
        self.ctx.transport.archive_thread(&doc.id).await
    }
}

impl Screen for Hangman {
    fn name(&self) -> &'static str {
        SCREEN
    }

    fn description(&self) -> &'static str {
        "A guessing game for two or more players"
    }

    fn color(&self) -> u32 {
        colors::PURPLE
    }

    fn is_game(&self) -> bool {
        true
    }

    fn delete_needs_author(&self) -> bool {
        true
    }

    fn default_deletion_hours(&self) -> Option<u64> {
        Some(24)
    }

    fn serialized_capabilities(&self) -> HashSet<Capability> {
        [Capability::Thread].into()
    }

    fn help_text(&self) -> Option<String> {
        Some(
            [
                "* Reply to the private message with a word to start the game.",
                "* Guess letters in the game's thread, one or more at a time.",
                "* Seven wrong guesses hang the man.",
            ]
            .join("\n"),
        )
    }

    fn handlers(self: Arc<Self>) -> Vec<(Capability, Handler)> {
        let offer = Arc::clone(&self);
        let start = Arc::clone(&self);
        let guess = self;
        vec![
            (
                Capability::MenuSelect,
                handler(move |inv| {
                    let screen = Arc::clone(&offer);
                    async move { screen.offer_dm(inv).await }
                }),
            ),
            (
                Capability::Reply,
                handler(move |inv| {
                    let screen = Arc::clone(&start);
                    async move { screen.start_from_dm(inv).await }
                }),
            ),
            (
                Capability::Thread,
                handler(move |inv| {
                    let screen = Arc::clone(&guess);
                    async move { screen.guess(inv).await }
                }),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hide_word_masks_unguessed_letters() {
        let guessed: BTreeSet<char> = ['A', 'N'].into();
        assert_eq!(hide_word("BANANA", &guessed), "\\_ A N A N A");
    }

    #[test]
    fn hide_word_keeps_word_boundaries() {
        let guessed = BTreeSet::new();
        let hidden = hide_word("AB CD", &guessed);
        assert_eq!(hidden, "\\_ \\_\u{3000}\\_ \\_");
    }

    #[test]
    fn state_render_parse_round_trip() {
        let mut state = GameState::new();
        state.guessed.extend(['A', 'X', 'Z']);
        state.wrong = 2;
        let parsed = GameState::parse(&state.render()).expect("should parse");
        assert_eq!(parsed, state);
    }

    #[test]
    fn fresh_state_parses_with_no_letters() {
        let parsed = GameState::parse(&GameState::new().render()).unwrap();
        assert!(parsed.guessed.is_empty());
        assert_eq!(parsed.wrong, 0);
    }

    #[test]
    fn gallows_grows_with_each_phase() {
        let pictures: Vec<String> = (0..=MAX_WRONG).map(gallows).collect();
        for pair in pictures.windows(2) {
            assert_ne!(pair[0], pair[1], "every phase must change the picture");
        }
    }
}
