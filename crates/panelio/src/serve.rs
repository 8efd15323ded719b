// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `panelio serve` command implementation.
//!
//! Assembles the full stack — SQLite storage, the shared context, the
//! built-in screens, the frozen capability registry — restarts stored
//! deletion timers, and runs the dispatcher until shutdown.
//!
//! The chat-platform gateway is a collaborator behind the
//! [`panelio_core::Transport`] trait; platform adapter crates implement it
//! and are wired in [`connect_transport`]. The stack itself is
//! transport-agnostic: [`run_with_transport`] is the real entry point and is
//! exercised end-to-end by the integration tests with a mock transport.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use panelio_config::PanelioConfig;
use panelio_core::{PanelioError, Transport};
use panelio_dispatch::delete::restart_deletion_timers;
use panelio_dispatch::{Context, Dispatcher};
use panelio_registry::RegistryBuilder;
use panelio_screens::builtin_screens;
use panelio_storage::SqliteStore;

/// Initialize the tracing subscriber from the configured log level,
/// overridable with `RUST_LOG`.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("panelio={log_level}")));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Resolve the chat-platform transport for this build.
///
/// No platform adapter is compiled into the base build: gateways live in
/// separate adapter crates implementing [`Transport`] and are wired here.
fn connect_transport(config: &PanelioConfig) -> Result<Arc<dyn Transport>, PanelioError> {
    match &config.transport.token {
        Some(_) => Err(PanelioError::Config(
            "transport token is set but no platform adapter is compiled into this build".into(),
        )),
        None => Err(PanelioError::Config(
            "no chat transport configured; set [transport] token and compile a platform adapter"
                .into(),
        )),
    }
}

/// Runs the `panelio serve` command.
pub async fn run_serve(config: PanelioConfig) -> Result<(), PanelioError> {
    init_tracing(&config.agent.log_level);
    info!("starting panelio serve");

    let transport = connect_transport(&config)?;
    let cancel = CancellationToken::new();
    spawn_signal_handler(cancel.clone());
    run_with_transport(transport, config, cancel).await
}

/// Build the dispatch stack over any transport and run it to completion.
pub async fn run_with_transport(
    transport: Arc<dyn Transport>,
    config: PanelioConfig,
    cancel: CancellationToken,
) -> Result<(), PanelioError> {
    let dispatcher = build_stack(transport, &config).await?;

    // Documents scheduled for self-deletion before the last shutdown get
    // their timers back before new events flow.
    if let Err(err) = restart_deletion_timers(dispatcher.context()).await {
        warn!(error = %err, "deletion timer restart failed");
    }

    info!(version = env!("CARGO_PKG_VERSION"), "panelio ready");
    dispatcher.run(cancel).await
}

/// Wire storage, context, screens, and the registry into a dispatcher.
pub async fn build_stack(
    transport: Arc<dyn Transport>,
    config: &PanelioConfig,
) -> Result<Dispatcher, PanelioError> {
    let storage = SqliteStore::new(config.storage.clone());
    storage.initialize().await?;
    let storage = Arc::new(storage);

    let ctx = Arc::new(
        Context::new(
            transport,
            storage.clone(),
            storage.clone(),
            storage,
            env!("CARGO_PKG_VERSION"),
        )
        .with_default_deletion_hours(config.ui.default_deletion_hours)
        .with_bulk_delete_max(config.ui.bulk_delete_max),
    );

    let mut builder = RegistryBuilder::new();
    for screen in builtin_screens(&ctx) {
        builder = builder.register(screen);
    }
    let registry = builder.build();
    info!(screens = registry.screens().count(), "capability registry frozen");
    ctx.install_registry(registry)?;

    Ok(Dispatcher::new(ctx))
}

fn spawn_signal_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received");
            cancel.cancel();
        }
    });
}
