// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the complete dispatch pipeline.
//!
//! Each test assembles an isolated harness (mock transport + temp SQLite or
//! in-memory stores) with the built-in screens and drives it through real
//! inbound events, asserting on the resulting document states.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use panelio_codec::decode_footer;
use panelio_core::types::NoticeKind;
use panelio_core::Transport;
use panelio_registry::{handler, Capability, Handler, Invocation, Screen};
use panelio_screens::builtin_screens;
use panelio_test_utils::{admin, member, member_with_roles, TestHarness};

async fn harness() -> TestHarness {
    TestHarness::builder()
        .with_screens(|ctx| builtin_screens(&ctx))
        .build()
        .await
        .expect("harness should build")
}

// ---- Main menu ----

#[tokio::test]
async fn mention_sends_main_menu_and_persists_authorship() {
    let h = harness().await;
    let alice = member("u-alice", "alice");

    h.mention(&alice, "").await;

    let menu = h.last_sent().await;
    assert_eq!(decode_footer(menu.footer.as_deref().unwrap()).as_deref(), Some("MainMenu"));
    assert!(menu.buttons().any(|b| b.label == "help"));
    assert!(menu.buttons().any(|b| b.label == "delete"));

    let record = h.ctx.messages.get_message(&menu.id).await.unwrap().unwrap();
    assert_eq!(record.author_id.unwrap().0, "u-alice");
}

#[tokio::test]
async fn home_button_restores_main_menu_and_transfers_authorship() {
    let h = harness().await;
    let alice = member("u-alice", "alice");

    h.mention(&alice, "").await;
    let menu = h.last_sent().await;
    h.select(&menu.id, &alice, &["Poll"]).await;
    let poll_menu = h.document(&menu.id).await;
    assert_eq!(decode_footer(poll_menu.footer.as_deref().unwrap()).as_deref(), Some("Poll"));

    // An admin takes the menu home; authorship moves to them.
    let boss = admin("u-boss", "boss");
    h.click_label(&menu.id, &boss, "home").await;

    let back = h.document(&menu.id).await;
    assert_eq!(decode_footer(back.footer.as_deref().unwrap()).as_deref(), Some("MainMenu"));
    let record = h.ctx.messages.get_message(&menu.id).await.unwrap().unwrap();
    assert_eq!(record.author_id.unwrap().0, "u-boss");
}

#[tokio::test]
async fn help_rewrites_in_place_and_back_restores_the_screen() {
    let h = harness().await;
    let alice = member("u-alice", "alice");

    h.mention(&alice, "").await;
    let menu = h.last_sent().await;
    h.select(&menu.id, &alice, &["Poll"]).await;

    h.click_label(&menu.id, &alice, "help").await;
    let help = h.document(&menu.id).await;
    assert_eq!(help.title, "Help");
    assert!(help.body.contains("Create a poll"));
    // The footer still names the owning screen, so back can restore it.
    assert_eq!(decode_footer(help.footer.as_deref().unwrap()).as_deref(), Some("Poll"));

    h.click_label(&menu.id, &alice, "back").await;
    let restored = h.document(&menu.id).await;
    assert_eq!(restored.title, "Create a poll for users to vote on.");
}

#[tokio::test]
async fn main_menu_help_is_reserved_for_the_author() {
    let h = harness().await;
    let alice = member("u-alice", "alice");
    let mallory = member("u-mallory", "mallory");

    h.mention(&alice, "").await;
    let menu = h.last_sent().await;

    h.click_label(&menu.id, &mallory, "help").await;
    assert_ne!(h.document(&menu.id).await.title, "Help", "stranger's help click is a no-op");

    h.click_label(&menu.id, &alice, "help").await;
    assert_eq!(h.document(&menu.id).await.title, "Help");
}

// ---- Delete control & records ----

#[tokio::test]
async fn delete_control_removes_document_and_cascades_the_record() {
    let h = harness().await;
    let alice = member("u-alice", "alice");

    h.mention(&alice, "").await;
    let menu = h.last_sent().await;
    assert!(h.ctx.messages.get_message(&menu.id).await.unwrap().is_some());

    h.click_label(&menu.id, &alice, "delete").await;
    assert!(h.transport.document(&menu.id).await.is_none());

    // The transport echoed a raw Delete event; feed it through the loop.
    let event = h.transport.next_event().await.unwrap();
    h.dispatcher.handle_event(event).await;
    assert!(h.ctx.messages.get_message(&menu.id).await.unwrap().is_none());
}

#[tokio::test]
async fn strangers_cannot_delete_the_main_menu() {
    let h = harness().await;
    let alice = member("u-alice", "alice");
    let mallory = member("u-mallory", "mallory");

    h.mention(&alice, "").await;
    let menu = h.last_sent().await;

    h.click_label(&menu.id, &mallory, "delete").await;
    assert!(h.transport.document(&menu.id).await.is_some());

    h.click_label(&menu.id, &alice, "delete").await;
    assert!(h.transport.document(&menu.id).await.is_none());
}

#[tokio::test]
async fn pinned_documents_survive_the_delete_control() {
    let h = harness().await;
    let alice = member("u-alice", "alice");

    h.mention(&alice, "").await;
    let menu = h.last_sent().await;
    h.transport.set_pinned(&menu.id, true).await;

    h.click_label(&menu.id, &alice, "delete").await;
    assert!(h.transport.document(&menu.id).await.is_some());
}

#[tokio::test]
async fn raw_delete_cleans_the_stored_record() {
    let h = harness().await;
    let alice = member("u-alice", "alice");

    h.mention(&alice, "").await;
    let menu = h.last_sent().await;

    h.raw_delete(&menu.id).await;
    assert!(h.ctx.messages.get_message(&menu.id).await.unwrap().is_none());
}

// ---- Poll ----

async fn open_poll(h: &TestHarness, actor: &panelio_core::Actor) -> panelio_core::DocumentId {
    h.mention(actor, "").await;
    let menu = h.last_sent().await;
    h.select(&menu.id, actor, &["Poll"]).await;
    h.click_label(&menu.id, actor, "New poll").await;
    menu.id
}

#[tokio::test]
async fn poll_lifecycle_responses_votes_and_end() {
    let h = harness().await;
    let alice = member("u-alice", "alice");
    let poll = open_poll(&h, &alice).await;

    let doc = h.document(&poll).await;
    assert_eq!(doc.title, "New poll");

    // Replies manage the poll: add two responses and set the question.
    h.reply(&poll, &alice, "question Lunch spot?; tacos; sushi").await;
    let doc = h.document(&poll).await;
    assert_eq!(doc.title, "Lunch spot?");
    let labels: Vec<String> = doc.buttons().map(|b| b.label.clone()).collect();
    assert_eq!(labels.len(), 2);
    assert!(labels[0].contains("tacos"));
    assert!(labels[1].contains("sushi"));

    // Two votes on tacos, one retracted vote on sushi.
    let bob = member("u-bob", "bob");
    let tacos = doc.buttons().next().unwrap().label.clone();
    h.click_label(&poll, &alice, &tacos).await;
    let tacos = h.document(&poll).await.buttons().next().unwrap().label.clone();
    h.click_label(&poll, &bob, &tacos).await;
    let doc = h.document(&poll).await;
    assert!(doc.buttons().next().unwrap().label.starts_with("(2)"));

    let sushi = doc.buttons().nth(1).unwrap().label.clone();
    h.click_label(&poll, &bob, &sushi).await;
    let sushi = h.document(&poll).await.buttons().nth(1).unwrap().label.clone();
    h.click_label(&poll, &bob, &sushi).await;
    let doc = h.document(&poll).await;
    assert!(doc.buttons().nth(1).unwrap().label.starts_with("(0)"));

    // End the poll: content sentinel set, the leader highlighted.
    h.reply(&poll, &alice, "end").await;
    let doc = h.document(&poll).await;
    assert_eq!(doc.content, "`Ended`");
    assert_eq!(
        doc.buttons().next().unwrap().style,
        panelio_core::types::ButtonStyle::Primary
    );

    // Votes on an ended poll are inert.
    let tacos = doc.buttons().next().unwrap().label.clone();
    h.click_label(&poll, &bob, &tacos).await;
    assert!(h.document(&poll).await.buttons().next().unwrap().label.starts_with("(2)"));
}

#[tokio::test]
async fn fixed_poll_rejects_response_changes_but_keeps_votes_open() {
    let h = harness().await;
    let alice = member("u-alice", "alice");
    let poll = open_poll(&h, &alice).await;

    h.reply(&poll, &alice, "tacos; fix").await;
    let doc = h.document(&poll).await;
    assert_eq!(doc.content, "`Fixed`");
    assert_eq!(doc.buttons().count(), 1);

    h.reply(&poll, &alice, "sushi").await;
    assert_eq!(h.document(&poll).await.buttons().count(), 1, "fixed poll gains no responses");

    let tacos = h.document(&poll).await.buttons().next().unwrap().label.clone();
    h.click_label(&poll, &alice, &tacos).await;
    assert!(h.document(&poll).await.buttons().next().unwrap().label.starts_with("(1)"));
}

#[tokio::test]
async fn over_long_responses_are_rejected_with_a_warning() {
    let h = harness().await;
    let alice = member("u-alice", "alice");
    let poll = open_poll(&h, &alice).await;

    h.reply(&poll, &alice, "this response is far far far too long to fit")
        .await;
    assert_eq!(h.document(&poll).await.buttons().count(), 0);
    let notices = h.transport.notices().await;
    assert!(notices
        .iter()
        .any(|(_, n)| n.kind == NoticeKind::Warn && n.text.contains("25 characters")));
}

#[tokio::test]
async fn poll_remove_deletes_responses_by_index() {
    let h = harness().await;
    let alice = member("u-alice", "alice");
    let poll = open_poll(&h, &alice).await;

    h.reply(&poll, &alice, "one; two; three").await;
    h.reply(&poll, &alice, "remove 1").await;

    let doc = h.document(&poll).await;
    let names: Vec<String> = doc
        .buttons()
        .map(|b| panelio_screens::poll::response_name(&b.label))
        .collect();
    assert_eq!(names, vec!["one", "three"]);
}

// ---- Permission/authorship gates ----

#[tokio::test]
async fn non_author_cannot_start_a_poll_even_when_role_storage_fails() {
    let h = TestHarness::builder()
        .with_screens(|ctx| builtin_screens(&ctx))
        .with_memory_stores()
        .build()
        .await
        .unwrap();
    let alice = member("u-alice", "alice");
    let mallory = member("u-mallory", "mallory");

    h.mention(&alice, "").await;
    let menu = h.last_sent().await;
    h.select(&menu.id, &alice, &["Poll"]).await;

    // The role check fails open on storage errors, but a successfully
    // fetched authorship mismatch still gates the click.
    h.memory.as_ref().unwrap().fail_options(true);
    h.click_label(&menu.id, &mallory, "New poll").await;
    let doc = h.document(&menu.id).await;
    assert_eq!(doc.title, "Create a poll for users to vote on.", "stranger click skipped");

    h.click_label(&menu.id, &alice, "New poll").await;
    assert_eq!(h.document(&menu.id).await.title, "New poll");
}

#[tokio::test]
async fn required_roles_gate_menu_navigation() {
    let h = harness().await;
    let alice = member("u-alice", "alice");

    h.ctx
        .options
        .set_option(&h.guild(), "Poll", &["poll makers".into()])
        .await
        .unwrap();

    h.mention(&alice, "").await;
    let menu = h.last_sent().await;
    h.select(&menu.id, &alice, &["Poll"]).await;
    assert_ne!(
        decode_footer(h.document(&menu.id).await.footer.as_deref().unwrap()).as_deref(),
        Some("Poll"),
        "alice lacks the required role"
    );

    let maker = member_with_roles("u-maker", "maker", &["poll makers"]);
    h.mention(&maker, "").await;
    let menu2 = h.last_sent().await;
    h.select(&menu2.id, &maker, &["Poll"]).await;
    assert_eq!(
        decode_footer(h.document(&menu2.id).await.footer.as_deref().unwrap()).as_deref(),
        Some("Poll")
    );
}

// ---- Connect Four ----

#[tokio::test]
async fn connect_four_full_game_to_horizontal_win() {
    let h = harness().await;
    let alice = member("u-alice", "alice");
    let bob = member("u-bob", "bob");

    // Main menu -> games menu -> start a lobby.
    h.mention(&alice, "").await;
    let menu = h.last_sent().await;
    h.select(&menu.id, &alice, &["Games"]).await;
    let games = h.document(&menu.id).await;
    assert_eq!(decode_footer(games.footer.as_deref().unwrap()).as_deref(), Some("Games"));

    h.select(&menu.id, &alice, &["ConnectFour"]).await;
    let lobby = h.last_sent().await;
    assert_eq!(decode_footer(lobby.footer.as_deref().unwrap()).as_deref(), Some("ConnectFour"));
    assert!(!h.transport.scheduled_deletions().await.is_empty(), "lobby self-deletes");

    // Bob joins with the second token; Start appears for two players.
    h.click_emoji(&lobby.id, &bob, "\u{1F535}").await;
    let doc = h.document(&lobby.id).await;
    assert!(doc.buttons().any(|b| b.label == "Start"));

    h.click_label(&lobby.id, &bob, "Start").await;
    let board = h.document(&lobby.id).await;
    assert!(board.body.contains("Moves: "));
    assert!(board.buttons().any(|b| b.label == "forfeit"));

    // Alice (first joiner) moves first: 4,5,6,7 wins horizontally while
    // Bob answers on top.
    let plays = [
        (&alice, 0usize), (&bob, 0), (&alice, 1), (&bob, 1), (&alice, 2), (&bob, 2),
    ];
    let numbers = ["4\u{FE0F}\u{20E3}", "5\u{FE0F}\u{20E3}", "6\u{FE0F}\u{20E3}", "7\u{FE0F}\u{20E3}"];
    for (player, col) in plays {
        h.click_emoji(&lobby.id, player, numbers[col]).await;
    }
    let doc = h.document(&lobby.id).await;
    assert!(doc.body.contains("Moves: 445566"), "body: {}", doc.body);

    h.click_emoji(&lobby.id, &alice, numbers[3]).await;
    let ended = h.document(&lobby.id).await;
    assert_eq!(
        decode_footer(ended.footer.as_deref().unwrap()).as_deref(),
        Some("ConnectFour_ended")
    );
    assert!(ended.title.contains("alice wins against"));
    assert!(ended.body.contains("total wins: 1"));

    let wins = h
        .ctx
        .counters
        .get_counter(&alice.id, &h.guild(), "ConnectFour_wins")
        .await
        .unwrap();
    assert_eq!(wins, Some(1));
}

#[tokio::test]
async fn connect_four_rejects_out_of_turn_moves() {
    let h = harness().await;
    let alice = member("u-alice", "alice");
    let bob = member("u-bob", "bob");

    h.mention(&alice, "").await;
    let menu = h.last_sent().await;
    h.select(&menu.id, &alice, &["Games"]).await;
    h.select(&menu.id, &alice, &["ConnectFour"]).await;
    let lobby = h.last_sent().await;
    h.click_emoji(&lobby.id, &bob, "\u{1F535}").await;
    h.click_label(&lobby.id, &bob, "Start").await;

    // Bob tries to move first; alice owns the opening turn.
    h.click_emoji(&lobby.id, &bob, "1\u{FE0F}\u{20E3}").await;
    assert!(h.document(&lobby.id).await.body.ends_with("Moves: "));

    h.click_emoji(&lobby.id, &alice, "1\u{FE0F}\u{20E3}").await;
    assert!(h.document(&lobby.id).await.body.ends_with("Moves: 1"));
}

#[tokio::test]
async fn connect_four_forfeit_ends_the_game_for_the_opponent() {
    let h = harness().await;
    let alice = member("u-alice", "alice");
    let bob = member("u-bob", "bob");

    h.mention(&alice, "").await;
    let menu = h.last_sent().await;
    h.select(&menu.id, &alice, &["Games"]).await;
    h.select(&menu.id, &alice, &["ConnectFour"]).await;
    let lobby = h.last_sent().await;
    h.click_emoji(&lobby.id, &bob, "\u{1F535}").await;
    h.click_label(&lobby.id, &bob, "Start").await;

    h.click_label(&lobby.id, &bob, "forfeit").await;
    let ended = h.document(&lobby.id).await;
    assert!(ended.title.contains("forfeits against user-u-alice"));
    let wins = h
        .ctx
        .counters
        .get_counter(&alice.id, &h.guild(), "ConnectFour_wins")
        .await
        .unwrap();
    assert_eq!(wins, Some(1));
}

// ---- Hangman ----

#[tokio::test]
async fn hangman_full_game_through_dm_and_thread() {
    let h = harness().await;
    let alice = member("u-alice", "alice");
    let bob = member("u-bob", "bob");

    h.mention(&alice, "").await;
    let menu = h.last_sent().await;
    h.select(&menu.id, &alice, &["Games"]).await;
    h.select(&menu.id, &alice, &["Hangman"]).await;

    // Alice received a DM asking for the word.
    let directs = h.transport.directs().await;
    assert_eq!(directs.len(), 1);
    let dm = directs[0].1.clone();

    h.reply(&dm, &alice, "rust").await;
    let game = h.last_sent().await;
    assert_eq!(decode_footer(game.footer.as_deref().unwrap()).as_deref(), Some("Hangman"));
    assert_eq!(game.title, "\\_ \\_ \\_ \\_");
    assert_eq!(h.transport.threads().await.len(), 1);

    // A wrong guess advances the gallows.
    h.thread_message(&game.id, &bob, "z").await;
    let doc = h.document(&game.id).await;
    assert!(doc.body.contains("Wrong guesses: 1/7"));

    // Guessing all letters ends the game in bob's favor.
    h.thread_message(&game.id, &bob, "r u s t").await;
    let ended = h.document(&game.id).await;
    assert_eq!(decode_footer(ended.footer.as_deref().unwrap()).as_deref(), Some("Hangman_ended"));
    assert_eq!(ended.title, "RUST");
    assert!(ended.body.contains("**user-u-bob** wins!"));
    assert_eq!(h.transport.archived_threads().await.len(), 1);

    let wins = h
        .ctx
        .counters
        .get_counter(&bob.id, &h.guild(), "Hangman_wins")
        .await
        .unwrap();
    assert_eq!(wins, Some(1));
}

#[tokio::test]
async fn hangman_seven_wrong_guesses_hand_the_win_to_the_setter() {
    let h = harness().await;
    let alice = member("u-alice", "alice");
    let bob = member("u-bob", "bob");

    h.mention(&alice, "").await;
    let menu = h.last_sent().await;
    h.select(&menu.id, &alice, &["Games"]).await;
    h.select(&menu.id, &alice, &["Hangman"]).await;
    let dm = h.transport.directs().await[0].1.clone();
    h.reply(&dm, &alice, "q").await;
    let game = h.last_sent().await;

    h.thread_message(&game.id, &bob, "a b c d e f g").await;
    let ended = h.document(&game.id).await;
    assert_eq!(decode_footer(ended.footer.as_deref().unwrap()).as_deref(), Some("Hangman_ended"));
    assert!(ended.body.contains("**user-u-alice** wins!"));
}

// ---- Config ----

#[tokio::test]
async fn config_commit_round_trips_required_roles() {
    let h = harness().await;
    let boss = admin("u-boss", "boss");
    h.transport
        .set_roles(vec!["mods".into(), "poll makers".into(), "everyone".into()])
        .await;

    h.mention(&boss, "").await;
    let menu = h.last_sent().await;
    h.select(&menu.id, &boss, &["Config"]).await;
    h.select(&menu.id, &boss, &["Poll"]).await;
    let picker = h.document(&menu.id).await;
    assert_eq!(picker.title, "Poll");

    h.select(&menu.id, &boss, &["poll makers"]).await;
    h.click_label(&menu.id, &boss, "commit").await;

    let stored = h.ctx.options.get_option(&h.guild(), "Poll").await.unwrap();
    assert_eq!(stored, vec!["poll makers".to_string()]);

    // Clearing and committing removes the option.
    h.click_label(&menu.id, &boss, "clear").await;
    h.click_label(&menu.id, &boss, "commit").await;
    assert!(h.ctx.options.get_option(&h.guild(), "Poll").await.unwrap().is_empty());
}

// ---- Bulk delete ----

#[tokio::test]
async fn mention_clear_bulk_deletes_own_screens_only() {
    let h = harness().await;
    let alice = member("u-alice", "alice");
    let boss = admin("u-boss", "boss");

    h.mention(&alice, "").await;
    let m1 = h.last_sent().await;
    h.mention(&alice, "").await;
    let m2 = h.last_sent().await;

    h.mention(&boss, "clear 10").await;
    assert!(h.transport.document(&m1.id).await.is_none());
    assert!(h.transport.document(&m2.id).await.is_none());
}

#[tokio::test]
async fn bulk_delete_rejects_out_of_range_counts() {
    let h = harness().await;
    let boss = admin("u-boss", "boss");

    h.mention(&boss, "clear 900").await;
    let notices = h.transport.notices().await;
    assert!(notices
        .iter()
        .any(|(_, n)| n.kind == NoticeKind::Warn && n.text.contains("1 to 50")));
}

#[tokio::test]
async fn bulk_delete_requires_administrator() {
    let h = harness().await;
    let alice = member("u-alice", "alice");

    h.mention(&alice, "").await;
    let menu = h.last_sent().await;
    h.mention(&alice, "clear 5").await;
    assert!(h.transport.document(&menu.id).await.is_some());
}

// ---- Cross-cutting dispatch with a brand-new screen type ----

struct Echo {
    clicks: Arc<AtomicUsize>,
}

impl Screen for Echo {
    fn name(&self) -> &'static str {
        "Echo"
    }

    fn description(&self) -> &'static str {
        "Echoes button clicks."
    }

    fn color(&self) -> u32 {
        0x123456
    }

    fn handlers(self: Arc<Self>) -> Vec<(Capability, Handler)> {
        let clicks = Arc::clone(&self.clicks);
        let menu = Arc::clone(&self);
        vec![
            (
                Capability::ButtonClick,
                handler(move |_inv: Invocation| {
                    let clicks = Arc::clone(&clicks);
                    async move {
                        clicks.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    }
                }),
            ),
            (
                Capability::MenuSelect,
                handler(move |inv: Invocation| {
                    let screen = Arc::clone(&menu);
                    async move {
                        // Back lands here with the sentinel payload.
                        if inv.payload.is_back() {
                            screen.clicks.fetch_add(100, Ordering::SeqCst);
                        }
                        Ok(())
                    }
                }),
            ),
        ]
    }
}

#[tokio::test]
async fn back_help_delete_work_on_a_screen_added_without_dispatcher_changes() {
    let clicks = Arc::new(AtomicUsize::new(0));
    let clicks_for_factory = Arc::clone(&clicks);
    let h = TestHarness::builder()
        .with_screens(move |_ctx| {
            vec![Arc::new(Echo {
                clicks: clicks_for_factory,
            }) as Arc<dyn Screen>]
        })
        .build()
        .await
        .unwrap();
    let alice = member("u-alice", "alice");

    // Hand-build an Echo screen document the way any screen would.
    let built = panelio_codec::ScreenBuilder::new("Echo", "0.0.0-test")
        .title("Echo")
        .control(panelio_codec::back_button())
        .control(panelio_codec::help_button())
        .control(panelio_codec::delete_button())
        .build()
        .unwrap();
    let doc = h.ctx.transport.send_document(&h.channel(), built).await.unwrap();

    h.click_label(&doc.id, &alice, "back").await;
    assert_eq!(clicks.load(Ordering::SeqCst), 100, "back reached Echo's menu handler");

    h.click_label(&doc.id, &alice, "help").await;
    let help = h.document(&doc.id).await;
    assert_eq!(help.title, "Help");
    assert!(help.body.contains("Echoes button clicks."));

    h.click_label(&doc.id, &alice, "delete").await;
    assert!(h.transport.document(&doc.id).await.is_none());
}

// ---- Undecodable footers stay inert ----

#[tokio::test]
async fn documents_without_a_footer_are_ignored() {
    let h = harness().await;
    let alice = member("u-alice", "alice");

    let built = panelio_core::types::NewDocument {
        title: "plain".into(),
        controls: vec![panelio_codec::delete_button()],
        ..Default::default()
    };
    let doc = h.ctx.transport.send_document(&h.channel(), built).await.unwrap();

    // Clicks and selections on an untyped document drop silently -- even
    // the cross-cutting delete control needs a decodable screen type.
    h.click_label(&doc.id, &alice, "delete").await;
    assert!(h.transport.document(&doc.id).await.is_some());
    h.select(&doc.id, &alice, &["Poll"]).await;
    assert_eq!(h.document(&doc.id).await.title, "plain");
}
