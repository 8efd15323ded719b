// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The games menu screen: start a game or view its leaderboard.

use std::sync::Arc;

use tracing::debug;

use panelio_codec::{
    delete_button, document_screen_type, help_button, home_button, ScreenBuilder,
};
use panelio_core::types::{Control, Menu, MenuOption, Notice};
use panelio_core::PanelioError;
use panelio_dispatch::{Context, Gate, MAIN_MENU_TYPE};
use panelio_registry::{handler, Capability, Handler, Invocation, Payload, Screen};

const SCREEN: &str = "Games";
const LEADERBOARD_SUFFIX: &str = " - leaderboard";

pub struct GamesMenu {
    ctx: Arc<Context>,
}

impl GamesMenu {
    pub fn new(ctx: Arc<Context>) -> Arc<Self> {
        Arc::new(Self { ctx })
    }

    async fn route_select(&self, inv: Invocation) -> Result<(), PanelioError> {
        let doc_type = document_screen_type(&inv.document);
        let on_menu_screen = matches!(
            doc_type.as_deref(),
            Some(MAIN_MENU_TYPE) | Some(SCREEN)
        );

        match &inv.payload {
            Payload::Back => self.open_games_menu(&inv).await,
            Payload::Menu { values } if on_menu_screen => {
                let Some(selected) = values.first() else {
                    return Ok(());
                };
                if selected == SCREEN {
                    return self.open_games_menu(&inv).await;
                }
                if let Some(game) = selected.strip_suffix(LEADERBOARD_SUFFIX) {
                    return self.send_leaderboard(&inv, game.trim()).await;
                }
                let is_game = self
                    .ctx
                    .screen(selected)
                    .is_some_and(|info| info.is_game);
                if is_game {
                    // Relay the selection to the chosen game's own handlers.
                    return self
                        .ctx
                        .dispatch_capability(Capability::MenuSelect, selected, inv.clone())
                        .await;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Edit the document into the games menu.
    async fn open_games_menu(&self, inv: &Invocation) -> Result<(), PanelioError> {
        let doc = &inv.document;
        if !Gate::roles_and_author()
            .check(&self.ctx, &inv.actor, doc, SCREEN)
            .await
        {
            return Ok(());
        }

        debug!(document = %doc.id, "games menu");

        let games: Vec<_> = self
            .ctx
            .registry()
            .map(|r| r.games().collect())
            .unwrap_or_default();
        let game_options: Vec<MenuOption> = games
            .iter()
            .map(|g| MenuOption::new(g.name).with_description(g.description))
            .collect();
        let board_options: Vec<MenuOption> = games
            .iter()
            .map(|g| MenuOption::new(format!("{}{LEADERBOARD_SUFFIX}", g.name)))
            .collect();

        let built = ScreenBuilder::new(SCREEN, &self.ctx.version)
            .author_label(&inv.actor.display_name)
            .color(self.color())
            .control(Control::Menu(Menu::new("Select a game", game_options)))
            .control(Control::Menu(Menu::new(
                "Select a leaderboard",
                board_options,
            )))
            .control(home_button())
            .control(help_button())
            .control(delete_button())
            .build()?;
        self.ctx.transport.edit_document(&doc.id, built).await
    }

    /// Top-ten wins for a game, as a transient notice.
    async fn send_leaderboard(&self, inv: &Invocation, game: &str) -> Result<(), PanelioError> {
        let doc = &inv.document;
        let counter = format!("{game}_wins");
        let board = self.ctx.counters.counters_named(&doc.guild_id, &counter).await?;

        debug!(guild = %doc.guild_id, game, entries = board.len(), "leaderboard");

        if board.is_empty() {
            return self
                .ctx
                .transport
                .send_notice(
                    &doc.channel_id,
                    Notice::info(format!("No leaderboard data for {game} in this server")),
                )
                .await;
        }

        let mut lines = vec![format!("{game} leaderboard:")];
        for (rank, (user, wins)) in board.iter().take(10).enumerate() {
            let name = self
                .ctx
                .transport
                .resolve_member(&doc.guild_id, user)
                .await
                .map(|a| a.display_name)
                .unwrap_or_else(|| user.to_string());
            lines.push(format!("{}.  {name}: {wins}", rank + 1));
        }
        self.ctx
            .transport
            .send_notice(&doc.channel_id, Notice::info(lines.join("\n")))
            .await
    }
}

impl Screen for GamesMenu {
    fn name(&self) -> &'static str {
        SCREEN
    }

    fn description(&self) -> &'static str {
        "A menu for starting games and seeing leaderboards."
    }

    fn color(&self) -> u32 {
        panelio_codec::colors::YELLOW
    }

    fn delete_needs_author(&self) -> bool {
        true
    }

    fn help_text(&self) -> Option<String> {
        Some(
            [
                "* Select a game to start that game.",
                "* Select a game's leaderboard to see other members' wins",
                "\n* Games will be automatically deleted after 24h.",
            ]
            .join("\n"),
        )
    }

    fn handlers(self: Arc<Self>) -> Vec<(Capability, Handler)> {
        let select = self;
        vec![(
            Capability::MenuSelect,
            handler(move |inv| {
                let screen = Arc::clone(&select);
                async move { screen.route_select(inv).await }
            }),
        )]
    }
}
