// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in command and game screens for the Panelio screen engine.
//!
//! Screens implement [`panelio_registry::Screen`] and are wired into the
//! capability registry at startup. Every screen's state lives in its
//! document (and its info rows), never in process memory — see each module
//! for the specific encoding it uses.

pub mod config_screen;
pub mod connect_four;
pub mod games_menu;
pub mod hangman;
pub mod poll;

use std::sync::Arc;

use panelio_dispatch::Context;
use panelio_registry::Screen;

pub use config_screen::ConfigScreen;
pub use connect_four::ConnectFour;
pub use games_menu::GamesMenu;
pub use hangman::Hangman;
pub use poll::Poll;

/// Construct every built-in screen, in main-menu order.
pub fn builtin_screens(ctx: &Arc<Context>) -> Vec<Arc<dyn Screen>> {
    vec![
        Poll::new(Arc::clone(ctx)) as Arc<dyn Screen>,
        GamesMenu::new(Arc::clone(ctx)),
        ConfigScreen::new(Arc::clone(ctx)),
        ConnectFour::new(Arc::clone(ctx)),
        Hangman::new(Arc::clone(ctx)),
    ]
}
