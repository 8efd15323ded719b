// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Connect-Four game screen.
//!
//! Three phases, all carried by one document: a lobby where two players pick
//! tokens, the live board, and the ended screen. The board is never stored —
//! the move log in the document body is the canonical state and is re-derived
//! on every click (see [`engine`]).

pub mod engine;

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use panelio_codec::{colors, delete_button, ScreenBuilder};
use panelio_core::traits::increment_counter;
use panelio_core::types::{
    Button, ButtonStyle, Control, Document, InfoRow, MessageRecord, UserId,
};
use panelio_core::PanelioError;
use panelio_dispatch::delete::schedule_deletion;
use panelio_dispatch::Context;
use panelio_registry::{handler, Capability, Handler, Invocation, Payload, Screen};

use engine::{derive_grid, MoveLog, FULL_BOARD};

const SCREEN: &str = "ConnectFour";
const ENDED: &str = "ConnectFour_ended";
const WINS_COUNTER: &str = "ConnectFour_wins";
const CHOICE_INFO: &str = "cf_choice";

const EMPTY_CELL: &str = "\u{26AB}"; // ⚫
const TOKENS: [&str; 7] = [
    "\u{1F534}", // 🔴
    "\u{1F535}", // 🔵
    "\u{1F7E0}", // 🟠
    "\u{1F7E2}", // 🟢
    "\u{1F7E1}", // 🟡
    "\u{1F7E4}", // 🟤
    "\u{1F7E3}", // 🟣
];
const NUMBERS: [&str; 7] = [
    "1\u{FE0F}\u{20E3}",
    "2\u{FE0F}\u{20E3}",
    "3\u{FE0F}\u{20E3}",
    "4\u{FE0F}\u{20E3}",
    "5\u{FE0F}\u{20E3}",
    "6\u{FE0F}\u{20E3}",
    "7\u{FE0F}\u{20E3}",
];

const LOBBY_HINT: &str = "Select a token to **join** or **change** the already selected token!\n\
    Click on the **selected** token to leave the game.";

/// A lobby player: choice row order decides who moves first.
struct Player {
    user: UserId,
    token: String,
}

pub struct ConnectFour {
    ctx: Arc<Context>,
}

impl ConnectFour {
    pub fn new(ctx: Arc<Context>) -> Arc<Self> {
        Arc::new(Self { ctx })
    }

    /// Render a grid plus the column-number legend.
    fn grid_text(grid: &[Vec<String>]) -> String {
        let border = "\u{3000}".repeat(3);
        let mut text: String = grid
            .iter()
            .map(|row| format!("{border}{}{border}", row.join(" ")))
            .collect::<Vec<_>>()
            .join("\n");
        text.push('\n');
        text.push_str(&border);
        text.push_str(&NUMBERS.join(" "));
        text
    }

    /// Body of the live board screen; the `Moves:` line is the canonical state.
    fn board_body(moves: &MoveLog, token1: &str, token2: &str) -> String {
        let on_turn = if moves.player_on_turn() == 0 { token1 } else { token2 };
        let grid = derive_grid(moves, token1, token2, EMPTY_CELL);
        format!(
            "On turn: {on_turn}\n\n{}\n\nMoves: {}",
            Self::grid_text(&grid),
            moves.serialize()
        )
    }

    /// Recover the move log from a board body.
    fn parse_moves(body: &str) -> Option<MoveLog> {
        let digits = body.lines().last()?.strip_prefix("Moves: ")?;
        Some(MoveLog::parse(digits))
    }

    async fn players(&self, doc: &Document) -> Result<Vec<Player>, PanelioError> {
        let rows = self
            .ctx
            .messages
            .get_info(&doc.id, Some(CHOICE_INFO), None)
            .await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                Some(Player {
                    user: row.user_id?,
                    token: row.info?,
                })
            })
            .collect())
    }

    async fn display_name(&self, doc: &Document, user: &UserId) -> String {
        self.ctx
            .transport
            .resolve_member(&doc.guild_id, user)
            .await
            .map(|a| a.display_name)
            .unwrap_or_else(|| user.to_string())
    }

    fn token_buttons(selected: &HashSet<&str>) -> Vec<Control> {
        TOKENS
            .iter()
            .map(|&token| {
                let mut button = Button::emoji(token);
                if selected.contains(token) {
                    button.style = ButtonStyle::Success;
                }
                Control::Button(button)
            })
            .collect()
    }

    /// Start a lobby when "ConnectFour" is selected in the games menu.
    async fn start_lobby(&self, inv: Invocation) -> Result<(), PanelioError> {
        // Only a selection relayed from the games menu starts a lobby.
        let origin = panelio_codec::document_screen_type(&inv.document);
        if inv.payload.selected() != Some(SCREEN) || origin.as_deref() != Some("Games") {
            return Ok(());
        }
        let actor = &inv.actor;
        debug!(user = %actor.id, token = TOKENS[0], "connect four lobby");

        let mut controls = Self::token_buttons(&HashSet::from([TOKENS[0]]));
        controls.push(delete_button());

        let built = ScreenBuilder::new(SCREEN, &self.ctx.version)
            .author_label(&actor.display_name)
            .color(self.color())
            .body(format!(
                "{LOBBY_HINT}\n\n{} {}",
                actor.display_name, TOKENS[0]
            ))
            .controls(controls)
            .build()?;
        let doc = self
            .ctx
            .transport
            .send_document(&inv.document.channel_id, built)
            .await?;

        self.ctx
            .messages
            .add_message(MessageRecord {
                id: doc.id.clone(),
                channel_id: doc.channel_id.clone(),
                author_id: Some(actor.id.clone()),
                kind: Some(SCREEN.into()),
                info: vec![InfoRow::new(CHOICE_INFO)
                    .with_info(TOKENS[0])
                    .with_user(actor.id.clone())],
            })
            .await?;
        schedule_deletion(&self.ctx, &doc, SCREEN).await?;
        Ok(())
    }

    /// Join, change, or leave via the token buttons in the lobby.
    async fn token_selection(&self, inv: Invocation) -> Result<(), PanelioError> {
        let Payload::Button { control } = &inv.payload else {
            return Ok(());
        };
        let Some(token) = control.emoji.as_deref() else {
            return Ok(());
        };
        if !TOKENS.contains(&token) {
            return Ok(());
        }
        let doc = &inv.document;
        let actor = &inv.actor;
        let mut players = self.players(doc).await?;

        // Two players only; outsiders cannot touch a full lobby.
        if players.len() == 2 && players.iter().all(|p| p.user != actor.id) {
            return Ok(());
        }

        let mine = players.iter().position(|p| p.user == actor.id);
        let taken = players.iter().any(|p| p.token == token);
        match mine {
            Some(idx) if players[idx].token == token => {
                // Clicking the own selected token leaves the game.
                players.remove(idx);
            }
            Some(idx) => {
                if taken {
                    return Ok(());
                }
                // Join order decides who moves first, so keep it on change.
                players[idx].token = token.to_string();
            }
            None => {
                if taken {
                    return Ok(());
                }
                players.push(Player {
                    user: actor.id.clone(),
                    token: token.to_string(),
                });
            }
        }

        // Rewrite the choice rows in join order.
        self.ctx
            .messages
            .delete_info(&doc.id, CHOICE_INFO, None)
            .await?;
        for player in &players {
            self.ctx
                .messages
                .add_info(
                    &doc.id,
                    InfoRow::new(CHOICE_INFO)
                        .with_info(player.token.clone())
                        .with_user(player.user.clone()),
                )
                .await?;
        }

        // First remaining player owns the lobby document.
        let owner = players.first().map(|p| p.user.clone());
        self.ctx
            .messages
            .update_author(&doc.id, owner.as_ref())
            .await?;

        let mut body = format!("{LOBBY_HINT}\n\n");
        for player in &players {
            let name = self.display_name(doc, &player.user).await;
            body.push_str(&format!("{name} {}\n", player.token));
        }

        let selected: HashSet<&str> = players.iter().map(|p| p.token.as_str()).collect();
        let mut controls = Self::token_buttons(&selected);
        let mut builder = ScreenBuilder::new(SCREEN, &self.ctx.version)
            .color(self.color())
            .body(body);
        if let Some(owner) = &owner {
            builder = builder.author_label(self.display_name(doc, owner).await);
        }
        if players.len() == 2 {
            builder = builder.title("Click \"Start\" button to start the game");
            controls.push(Control::Button(
                Button::new("Start").with_style(ButtonStyle::Primary),
            ));
        }
        controls.push(delete_button());

        self.ctx
            .transport
            .edit_document(&doc.id, builder.controls(controls).build()?)
            .await
    }

    /// Replace the lobby with an empty board once both players are in.
    async fn start_game(&self, inv: Invocation) -> Result<(), PanelioError> {
        let Payload::Button { control } = &inv.payload else {
            return Ok(());
        };
        if control.label != "Start" {
            return Ok(());
        }
        let doc = &inv.document;
        let players = self.players(doc).await?;
        if players.len() != 2 || players.iter().all(|p| p.user != inv.actor.id) {
            return Ok(());
        }

        let name1 = self.display_name(doc, &players[0].user).await;
        let name2 = self.display_name(doc, &players[1].user).await;
        debug!(document = %doc.id, "connect four starting");

        let moves = MoveLog::new();
        let mut controls: Vec<Control> = NUMBERS
            .iter()
            .enumerate()
            .map(|(i, &n)| {
                Control::Button(Button::emoji(n).with_row(if i < 4 { 0 } else { 1 }))
            })
            .collect();
        controls.push(Control::Button(
            Button::new("forfeit")
                .with_style(ButtonStyle::Primary)
                .with_row(1),
        ));

        let built = ScreenBuilder::from_document(doc)
            .title(format!(
                "{name1} {}  vs  {name2} {}!",
                players[0].token, players[1].token
            ))
            .body(Self::board_body(&moves, &players[0].token, &players[1].token))
            .controls(controls)
            .build()?;
        self.ctx.transport.edit_document(&doc.id, built).await
    }

    /// Drop a token into a column, or forfeit.
    async fn play(&self, inv: Invocation) -> Result<(), PanelioError> {
        let Payload::Button { control } = &inv.payload else {
            return Ok(());
        };
        let column = control
            .emoji
            .as_deref()
            .and_then(|e| NUMBERS.iter().position(|&n| n == e))
            .map(|i| (i + 1) as u8);
        let forfeit = control.label == "forfeit";
        if column.is_none() && !forfeit {
            return Ok(());
        }

        let doc = &inv.document;
        let Some(mut moves) = Self::parse_moves(&doc.body) else {
            return Ok(());
        };
        let players = self.players(doc).await?;
        if players.len() != 2 || players.iter().all(|p| p.user != inv.actor.id) {
            return Ok(());
        }
        let (token1, token2) = (players[0].token.clone(), players[1].token.clone());

        if forfeit {
            // The opponent of the forfeiting player wins.
            let loser = players.iter().position(|p| p.user == inv.actor.id);
            let Some(loser) = loser else { return Ok(()) };
            let winner = 1 - loser;
            return self
                .finish(doc, &players, winner, &moves, Outcome::Forfeit)
                .await;
        }

        // Only the player owning the on-turn token may move.
        let on_turn = moves.player_on_turn();
        if players[on_turn].user != inv.actor.id {
            return Ok(());
        }
        let Some(column) = column else { return Ok(()) };
        if !moves.push(column) {
            return Ok(());
        }

        if moves.last_mover_won() {
            return self.finish(doc, &players, on_turn, &moves, Outcome::Win).await;
        }
        if moves.len() == FULL_BOARD {
            return self.finish(doc, &players, on_turn, &moves, Outcome::Draw).await;
        }

        let built = ScreenBuilder::from_document(doc)
            .body(Self::board_body(&moves, &token1, &token2))
            .controls(doc.controls.clone())
            .build()?;
        self.ctx.transport.edit_document(&doc.id, built).await
    }

    /// Rewrite the board into the ended screen and record the win.
    async fn finish(
        &self,
        doc: &Document,
        players: &[Player],
        winner: usize,
        moves: &MoveLog,
        outcome: Outcome,
    ) -> Result<(), PanelioError> {
        let winner_player = &players[winner];
        let loser_player = &players[1 - winner];
        let winner_name = self.display_name(doc, &winner_player.user).await;
        let loser_name = self.display_name(doc, &loser_player.user).await;

        let grid = derive_grid(moves, &players[0].token, &players[1].token, EMPTY_CELL);
        let mut body = format!("Game completed\n\n{}", Self::grid_text(&grid));

        let title = match outcome {
            Outcome::Win => format!(
                "{winner_name} wins against {loser_name} with {}!",
                winner_player.token
            ),
            Outcome::Forfeit => format!(
                "{loser_name} {} forfeits against {winner_name}!",
                loser_player.token
            ),
            Outcome::Draw => format!("{winner_name} draws against {loser_name}!"),
        };

        if !matches!(outcome, Outcome::Draw) {
            let wins = increment_counter(
                self.ctx.counters.as_ref(),
                &winner_player.user,
                &doc.guild_id,
                WINS_COUNTER,
            )
            .await?;
            let possessive = if winner_name.ends_with('s') {
                format!("**{winner_name}**'")
            } else {
                format!("**{winner_name}**'s")
            };
            body.push_str(&format!("\n\n{possessive} total wins: {wins}"));
            self.ctx
                .messages
                .update_author(&doc.id, Some(&winner_player.user))
                .await?;
        }

        debug!(document = %doc.id, title = %title, "connect four ended");

        let built = ScreenBuilder::new(ENDED, &self.ctx.version)
            .author_label(winner_name)
            .title(title)
            .body(body)
            .color(self.color())
            .control(delete_button())
            .build()?;
        self.ctx.transport.edit_document(&doc.id, built).await
    }
}

enum Outcome {
    Win,
    Forfeit,
    Draw,
}

impl Screen for ConnectFour {
    fn name(&self) -> &'static str {
        SCREEN
    }

    fn description(&self) -> &'static str {
        "A connection game between two players."
    }

    fn color(&self) -> u32 {
        colors::ORANGE
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

    fn help_text(&self) -> Option<String> {
        Some(
            [
                "* Select a token to join the game; two players are needed.",
                "* Click a column number to drop your token.",
                "* Four in a row in any direction wins.",
            ]
            .join("\n"),
        )
    }

    fn handlers(self: Arc<Self>) -> Vec<(Capability, Handler)> {
        let lobby = Arc::clone(&self);
        let tokens = Arc::clone(&self);
        let start = Arc::clone(&self);
        let play = self;
        vec![
            (
                Capability::MenuSelect,
                handler(move |inv| {
                    let screen = Arc::clone(&lobby);
                    async move { screen.start_lobby(inv).await }
                }),
            ),
            (
                Capability::ButtonClick,
                handler(move |inv| {
                    let screen = Arc::clone(&tokens);
                    async move { screen.token_selection(inv).await }
                }),
            ),
            (
                Capability::ButtonClick,
                handler(move |inv| {
                    let screen = Arc::clone(&start);
                    async move { screen.start_game(inv).await }
                }),
            ),
            (
                Capability::ButtonClick,
                handler(move |inv| {
                    let screen = Arc::clone(&play);
                    async move { screen.play(inv).await }
                }),
            ),
        ]
    }
}
