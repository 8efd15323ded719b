// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Permission and authorship gates.
//!
//! Both checks fail OPEN on internal errors (storage unreachable): a broken
//! database must not brick every button on every screen. This is a recorded
//! design risk, not an oversight — see DESIGN.md. A gate failure skips the
//! wrapped handler silently; an ignored click is intentional UI behavior,
//! not a fault.

use tracing::{debug, warn};

use panelio_core::types::{Actor, Document};

use crate::context::Context;

/// Role/permission check.
///
/// Administrators always pass. Otherwise the actor's role set must intersect
/// the per-guild option named after the screen; an empty configured set
/// passes everyone.
pub async fn role_gate(ctx: &Context, actor: &Actor, doc: &Document, screen_name: &str) -> bool {
    if actor.is_admin {
        return true;
    }
    debug!(user = %actor.id, screen = screen_name, "checking required roles");
    match ctx.options.get_option(&doc.guild_id, screen_name).await {
        Ok(required) => {
            required.is_empty() || required.iter().any(|role| actor.roles.contains(role))
        }
        Err(err) => {
            warn!(error = %err, screen = screen_name, "role check failed open");
            true
        }
    }
}

/// Authorship check.
///
/// Administrators always pass. Otherwise the actor must match the document's
/// recorded author; a record with no author (or no record at all) passes.
/// A successfully fetched record with a different author always fails —
/// fail-open covers storage errors only.
pub async fn author_gate(ctx: &Context, actor: &Actor, doc: &Document) -> bool {
    if actor.is_admin {
        return true;
    }
    debug!(user = %actor.id, document = %doc.id, "validating author");
    match ctx.messages.get_message(&doc.id).await {
        Ok(Some(record)) => match record.author_id {
            Some(author) => author == actor.id,
            None => true,
        },
        Ok(None) => true,
        Err(err) => {
            warn!(error = %err, document = %doc.id, "author check failed open");
            true
        }
    }
}

/// Composable gate pipeline applied in front of a handler body.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gate {
    roles: bool,
    author: bool,
}

impl Gate {
    /// Role check only.
    pub fn roles() -> Self {
        Self {
            roles: true,
            author: false,
        }
    }

    /// Authorship check only.
    pub fn author() -> Self {
        Self {
            roles: false,
            author: true,
        }
    }

    /// Both checks, roles first.
    pub fn roles_and_author() -> Self {
        Self {
            roles: true,
            author: true,
        }
    }

    /// Run the configured checks; `false` means skip the handler silently.
    pub async fn check(
        &self,
        ctx: &Context,
        actor: &Actor,
        doc: &Document,
        screen_name: &str,
    ) -> bool {
        if self.roles && !role_gate(ctx, actor, doc, screen_name).await {
            return false;
        }
        if self.author && !author_gate(ctx, actor, doc).await {
            return false;
        }
        true
    }
}
