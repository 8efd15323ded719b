// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The config command screen: manage which roles may use a command.
//!
//! The working set of selected roles lives in the document body (backticked,
//! comma separated) until `commit` persists it as the per-guild option named
//! after the command — the same option the role gate consults.

use std::sync::Arc;

use tracing::debug;

use panelio_codec::{
    back_button, delete_button, document_screen_type, help_button, home_button, ScreenBuilder,
};
use panelio_core::types::{Button, Control, Document, Menu, MenuOption, Notice};
use panelio_core::PanelioError;
use panelio_dispatch::{Context, Gate, MAIN_MENU_TYPE};
use panelio_registry::{handler, Capability, Handler, Invocation, Payload, Screen};

const SCREEN: &str = "Config";
const MENU_TITLE: &str = "Select a command to modify the roles allowed to use it";
const ROLES_PER_PAGE: usize = 25;

/// Render the working role set into the document body.
fn roles_to_body(roles: &[String]) -> String {
    roles
        .iter()
        .map(|r| format!("`{r}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse the working role set back out of the document body.
fn body_to_roles(body: &str) -> Vec<String> {
    body.split(", ")
        .map(|r| r.trim_matches('`').trim().to_string())
        .filter(|r| !r.is_empty())
        .collect()
}

pub struct ConfigScreen {
    ctx: Arc<Context>,
}

impl ConfigScreen {
    pub fn new(ctx: Arc<Context>) -> Arc<Self> {
        Arc::new(Self { ctx })
    }

    fn gate(&self) -> Gate {
        Gate::roles_and_author()
    }

    async fn route_select(&self, inv: Invocation) -> Result<(), PanelioError> {
        let doc_type = document_screen_type(&inv.document);
        match &inv.payload {
            Payload::Back => self.open_config_menu(&inv).await,
            Payload::Menu { values } => {
                let Some(selected) = values.first() else {
                    return Ok(());
                };
                if doc_type.as_deref() == Some(MAIN_MENU_TYPE) {
                    if selected == SCREEN {
                        return self.open_config_menu(&inv).await;
                    }
                    return Ok(());
                }
                let is_command = self
                    .ctx
                    .screen(selected)
                    .is_some_and(|info| !info.is_game);
                if is_command {
                    self.select_command(&inv, selected).await
                } else {
                    self.toggle_roles(&inv, values).await
                }
            }
            _ => Ok(()),
        }
    }

    /// Edit the document into the command-selection menu.
    async fn open_config_menu(&self, inv: &Invocation) -> Result<(), PanelioError> {
        let doc = &inv.document;
        if !self.gate().check(&self.ctx, &inv.actor, doc, SCREEN).await {
            return Ok(());
        }

        debug!(document = %doc.id, "config menu");

        let options: Vec<MenuOption> = self
            .ctx
            .registry()
            .map(|r| {
                r.commands()
                    .map(|c| MenuOption::new(c.name).with_description(c.description))
                    .collect()
            })
            .unwrap_or_default();

        let built = ScreenBuilder::new(SCREEN, &self.ctx.version)
            .author_label(&inv.actor.display_name)
            .title(MENU_TITLE)
            .color(self.color())
            .control(Control::Menu(Menu::new("Select a command", options)))
            .control(home_button())
            .control(help_button())
            .control(delete_button())
            .build()?;
        self.ctx.transport.edit_document(&doc.id, built).await
    }

    /// Show the role picker for one command, seeded with the stored roles.
    async fn select_command(&self, inv: &Invocation, command: &str) -> Result<(), PanelioError> {
        let doc = &inv.document;
        if !self.gate().check(&self.ctx, &inv.actor, doc, SCREEN).await {
            return Ok(());
        }

        debug!(command, guild = %doc.guild_id, "config command selected");

        let stored = self
            .ctx
            .options
            .get_option(&doc.guild_id, command)
            .await
            .unwrap_or_default();
        self.render_role_picker(doc, command, &stored, 0).await
    }

    async fn render_role_picker(
        &self,
        doc: &Document,
        command: &str,
        selected: &[String],
        page: usize,
    ) -> Result<(), PanelioError> {
        let all_roles = self.ctx.transport.guild_roles(&doc.guild_id).await?;
        let start = page * ROLES_PER_PAGE;
        let page_roles: Vec<MenuOption> = all_roles
            .iter()
            .skip(start)
            .take(ROLES_PER_PAGE)
            .map(|r| MenuOption::new(r.clone()))
            .collect();

        let mut placeholder = format!("Select roles for {command}");
        if page > 0 {
            placeholder.push_str(&format!(" (page {})", page + 1));
        }

        let mut controls = vec![Control::Menu(
            Menu::new(placeholder, page_roles.clone())
                .with_max_values(page_roles.len().min(20).max(1)),
        )];
        if page > 0 {
            controls.push(Control::Button(Button::new(format!(
                "page {} of roles",
                page
            ))));
        }
        if all_roles.len() > start + ROLES_PER_PAGE {
            controls.push(Control::Button(Button::new(format!(
                "page {} of roles",
                page + 2
            ))));
        }
        controls.push(back_button());
        controls.push(Control::Button(Button::new("clear")));
        controls.push(Control::Button(Button::new("commit")));

        let built = ScreenBuilder::new(SCREEN, &self.ctx.version)
            .title(command)
            .body(roles_to_body(selected))
            .color(self.color())
            .controls(controls)
            .build()?;
        self.ctx.transport.edit_document(&doc.id, built).await
    }

    /// Toggle the selected roles in the working set shown in the body.
    async fn toggle_roles(&self, inv: &Invocation, values: &[String]) -> Result<(), PanelioError> {
        let doc = &inv.document;
        if !self.gate().check(&self.ctx, &inv.actor, doc, SCREEN).await {
            return Ok(());
        }

        let mut current = body_to_roles(&doc.body);
        for role in values {
            match current.iter().position(|r| r == role) {
                Some(idx) => {
                    current.remove(idx);
                }
                None => current.push(role.clone()),
            }
        }

        let built = ScreenBuilder::from_document(doc)
            .body(roles_to_body(&current))
            .controls(doc.controls.clone())
            .build()?;
        self.ctx.transport.edit_document(&doc.id, built).await
    }

    async fn route_button(&self, inv: Invocation) -> Result<(), PanelioError> {
        let Payload::Button { control } = &inv.payload else {
            return Ok(());
        };
        match control.label.as_str() {
            "clear" => self.clear_roles(&inv).await,
            "commit" => self.commit_roles(&inv).await,
            label => {
                if let Some(page) = label
                    .strip_prefix("page ")
                    .and_then(|rest| rest.split_whitespace().next())
                    .and_then(|n| n.parse::<usize>().ok())
                {
                    self.change_page(&inv, page.saturating_sub(1)).await
                } else {
                    Ok(())
                }
            }
        }
    }

    async fn clear_roles(&self, inv: &Invocation) -> Result<(), PanelioError> {
        let doc = &inv.document;
        if !self.gate().check(&self.ctx, &inv.actor, doc, SCREEN).await {
            return Ok(());
        }

        debug!(document = %doc.id, "clearing working roles");

        let built = ScreenBuilder::from_document(doc)
            .body("")
            .controls(doc.controls.clone())
            .build()?;
        self.ctx.transport.edit_document(&doc.id, built).await
    }

    async fn change_page(&self, inv: &Invocation, page: usize) -> Result<(), PanelioError> {
        let doc = &inv.document;
        if !self.gate().check(&self.ctx, &inv.actor, doc, SCREEN).await {
            return Ok(());
        }
        if doc.title.is_empty() || doc.title == MENU_TITLE {
            return Ok(());
        }
        let command = doc.title.clone();
        let selected = body_to_roles(&doc.body);
        self.render_role_picker(doc, &command, &selected, page).await
    }

    /// Persist the working set as the command's required-roles option.
    async fn commit_roles(&self, inv: &Invocation) -> Result<(), PanelioError> {
        let doc = &inv.document;
        if !self.gate().check(&self.ctx, &inv.actor, doc, SCREEN).await {
            return Ok(());
        }
        if doc.title.is_empty() || doc.title == MENU_TITLE {
            return Ok(());
        }
        let command = doc.title.clone();
        let roles = body_to_roles(&doc.body);

        if roles.is_empty() {
            self.ctx.options.delete_option(&doc.guild_id, &command).await?;
            debug!(command = %command, guild = %doc.guild_id, "required roles removed");
            return self
                .ctx
                .transport
                .send_notice(
                    &doc.channel_id,
                    Notice::info(format!("Removed roles for {command}")),
                )
                .await;
        }

        self.ctx
            .options
            .set_option(&doc.guild_id, &command, &roles)
            .await?;
        debug!(command = %command, guild = %doc.guild_id, "required roles changed");
        self.ctx
            .transport
            .send_notice(
                &doc.channel_id,
                Notice::info(format!(
                    "Changed roles for {command} to `{}`",
                    roles.join(", ")
                )),
            )
            .await
    }
}

impl Screen for ConfigScreen {
    fn name(&self) -> &'static str {
        SCREEN
    }

    fn description(&self) -> &'static str {
        "Manage which roles are allowed to use a command"
    }

    fn color(&self) -> u32 {
        panelio_codec::colors::RED
    }

    fn delete_needs_author(&self) -> bool {
        true
    }

    fn help_text(&self) -> Option<String> {
        Some(
            [
                "* Select a command in a dropdown.",
                "* For the selected command, select the roles in a dropdown.",
                "* Selected roles will be allowed to use those commands.",
            ]
            .join("\n"),
        )
    }

    fn handlers(self: Arc<Self>) -> Vec<(Capability, Handler)> {
        let select = Arc::clone(&self);
        let button = self;
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
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_body_round_trip() {
        let roles = vec!["mods".to_string(), "poll makers".to_string()];
        let body = roles_to_body(&roles);
        assert_eq!(body, "`mods`, `poll makers`");
        assert_eq!(body_to_roles(&body), roles);
    }

    #[test]
    fn empty_body_parses_to_no_roles() {
        assert!(body_to_roles("").is_empty());
    }
}
