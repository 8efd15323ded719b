// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event classifier and router for the Panelio screen engine.
//!
//! The [`Dispatcher`] consumes typed inbound events from the transport,
//! decodes the target document's screen type through the footer codec, maps
//! the event to a capability tag, and invokes the registry's handlers —
//! through the resource queue when the screen declares the tag serialized.
//!
//! Cross-cutting controls (`delete`, `help`, `back`, `home`) are routed
//! before generic dispatch because they exist on every screen; registering a
//! new screen type requires no change to these behaviors.
//!
//! No error terminates the dispatch loop except a transport-stream failure:
//! handler errors are logged, vanished documents become tombstone cleanups,
//! and layout overflows surface to the channel as a warning.

pub mod context;
pub mod delete;
pub mod gate;
pub mod help;
pub mod menu;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use panelio_codec::{document_screen_type, BACK_LABEL, DELETE_LABEL, HELP_LABEL, HOME_LABEL};
use panelio_core::types::{InboundEvent, Notice};
use panelio_core::PanelioError;
use panelio_registry::{Capability, Invocation, Payload};

pub use context::Context;
pub use gate::{author_gate, role_gate, Gate};
pub use menu::MAIN_MENU_TYPE;

/// The event dispatch loop.
#[derive(Clone)]
pub struct Dispatcher {
    ctx: Arc<Context>,
}

impl Dispatcher {
    pub fn new(ctx: Arc<Context>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &Arc<Context> {
        &self.ctx
    }

    /// Run until the cancellation token fires or the transport stream fails.
    ///
    /// Each event is handled on its own task: two quick interactions may be
    /// suspended mid-handler concurrently, which is exactly the race the
    /// resource queue exists to serialize.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), PanelioError> {
        info!("dispatcher running");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping dispatcher");
                    return Ok(());
                }
                event = self.ctx.transport.next_event() => {
                    match event {
                        Ok(event) => {
                            let this = self.clone();
                            tokio::spawn(async move {
                                this.handle_event(event).await;
                            });
                        }
                        Err(err) => {
                            error!(error = %err, "transport stream failed");
                            return Err(err);
                        }
                    }
                }
            }
        }
    }

    /// Handle one inbound event. Never fails: errors are absorbed here so
    /// the loop survives anything a handler throws.
    pub async fn handle_event(&self, event: InboundEvent) {
        let channel = event.channel().cloned();
        let target = event.target().cloned();

        match self.route(event).await {
            Ok(()) => {}
            Err(err) if err.is_tombstone() => {
                // The document vanished underneath us: same cleanup as an
                // explicit deletion notification.
                debug!(error = %err, "tombstone cleanup");
                if let Some(id) = target
                    && let Err(err) = self.ctx.messages.delete_message(&id).await
                {
                    error!(document = %id, error = %err, "tombstone cleanup failed");
                }
            }
            Err(err @ PanelioError::LayoutOverflow { .. }) => {
                error!(error = %err, "screen layout overflow");
                if let Some(channel) = channel {
                    let _ = self
                        .ctx
                        .transport
                        .send_notice(&channel, Notice::warn("Maximum number of responses reached!"))
                        .await;
                }
            }
            Err(err) => {
                error!(error = %err, "event handling failed");
            }
        }
    }

    async fn route(&self, event: InboundEvent) -> Result<(), PanelioError> {
        let ctx = &self.ctx;
        match event {
            InboundEvent::Mention { message } => {
                // Tokens after the mention itself; "clear N" and friends
                // trigger the bulk delete instead of the main menu.
                let args: Vec<&str> = message.text.split_whitespace().skip(1).collect();
                if args.len() == 2 && matches!(args[0], "clear" | "delete" | "purge") {
                    delete::bulk_delete(ctx, &message, args[1]).await
                } else {
                    menu::send_main_menu(ctx, &message).await
                }
            }

            InboundEvent::Reply { message, target } => {
                let doc = ctx
                    .transport
                    .fetch_document(&message.channel_id, &target)
                    .await?;
                let Some(screen_type) = document_screen_type(&doc) else {
                    return Ok(());
                };
                debug!(document = %doc.id, screen = %screen_type, "reply");
                let actor = message.author.clone();
                ctx.dispatch_capability(
                    Capability::Reply,
                    &screen_type,
                    Invocation {
                        document: doc,
                        actor,
                        payload: Payload::Reply { message },
                    },
                )
                .await
            }

            InboundEvent::ThreadMessage { message, parent } => {
                let doc = ctx
                    .transport
                    .fetch_document(&message.channel_id, &parent)
                    .await?;
                let Some(screen_type) = document_screen_type(&doc) else {
                    return Ok(());
                };
                debug!(document = %doc.id, screen = %screen_type, "thread message");
                let actor = message.author.clone();
                ctx.dispatch_capability(
                    Capability::Thread,
                    &screen_type,
                    Invocation {
                        document: doc,
                        actor,
                        payload: Payload::Thread { message },
                    },
                )
                .await
            }

            InboundEvent::MenuSelect {
                document,
                channel,
                actor,
                values,
            } => {
                let doc = ctx.transport.fetch_document(&channel, &document).await?;
                if !doc.from_self {
                    return Ok(());
                }
                let Some(mut screen_type) = document_screen_type(&doc) else {
                    return Ok(());
                };
                // On the main menu the selected value names the target screen.
                if screen_type == MAIN_MENU_TYPE
                    && let Some(selected) = values.first()
                {
                    screen_type = selected.clone();
                }
                debug!(document = %doc.id, screen = %screen_type, "menu select");
                ctx.dispatch_capability(
                    Capability::MenuSelect,
                    &screen_type,
                    Invocation {
                        document: doc,
                        actor,
                        payload: Payload::Menu { values },
                    },
                )
                .await
            }

            InboundEvent::ButtonClick {
                document,
                channel,
                actor,
                control_id,
            } => {
                let doc = ctx.transport.fetch_document(&channel, &document).await?;
                if !doc.from_self {
                    return Ok(());
                }
                let Some(screen_type) = document_screen_type(&doc) else {
                    return Ok(());
                };
                let Some(button) = doc.button_by_id(&control_id).cloned() else {
                    return Ok(());
                };
                let label = button.label.clone();
                debug!(document = %doc.id, screen = %screen_type, label = %label, "button click");

                match label.as_str() {
                    DELETE_LABEL => delete::handle_delete_control(ctx, &doc, &actor).await,
                    HELP_LABEL => {
                        // A screen may register its own Help handlers; the
                        // built-in static rewrite is the fallback.
                        if ctx.handlers_for(Capability::Help, &screen_type).is_empty() {
                            help::rewrite_to_help(ctx, &doc, &actor).await
                        } else {
                            ctx.dispatch_capability(
                                Capability::Help,
                                &screen_type,
                                Invocation {
                                    document: doc,
                                    actor,
                                    payload: Payload::Button { control: button },
                                },
                            )
                            .await
                        }
                    }
                    HOME_LABEL => menu::return_home(ctx, &doc, &actor).await,
                    BACK_LABEL => {
                        // Re-invoke the owning screen's menu handler with the
                        // reserved back sentinel instead of a selection.
                        ctx.dispatch_capability(
                            Capability::MenuSelect,
                            &screen_type,
                            Invocation {
                                document: doc,
                                actor,
                                payload: Payload::Back,
                            },
                        )
                        .await
                    }
                    _ => {
                        ctx.dispatch_capability(
                            Capability::ButtonClick,
                            &screen_type,
                            Invocation {
                                document: doc,
                                actor,
                                payload: Payload::Button { control: button },
                            },
                        )
                        .await
                    }
                }
            }

            InboundEvent::Delete { document } => {
                debug!(document = %document, "raw delete cleanup");
                ctx.messages.delete_message(&document).await
            }

            InboundEvent::BulkDelete { documents } => {
                debug!(count = documents.len(), "raw bulk delete cleanup");
                for document in &documents {
                    ctx.messages.delete_message(document).await?;
                }
                Ok(())
            }
        }
    }
}
