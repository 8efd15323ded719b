// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./panelio.toml` > `~/.config/panelio/panelio.toml`
//! > `/etc/panelio/panelio.toml`, with environment variable overrides via the
//! `PANELIO_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PanelioConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/panelio/panelio.toml` (system-wide)
/// 3. `~/.config/panelio/panelio.toml` (user XDG config)
/// 4. `./panelio.toml` (local directory)
/// 5. `PANELIO_*` environment variables
pub fn load_config() -> Result<PanelioConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PanelioConfig::default()))
        .merge(Toml::file("/etc/panelio/panelio.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("panelio/panelio.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("panelio.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (testing and explicit config).
pub fn load_config_from_str(toml_content: &str) -> Result<PanelioConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PanelioConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PanelioConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PanelioConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `PANELIO_STORAGE_DATABASE_PATH` must map
/// to `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("PANELIO_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("transport_", "transport.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("ui_", "ui.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_loader_overrides_defaults() {
        let config = load_config_from_str(
            r#"
            [agent]
            name = "screens"
            log_level = "debug"

            [ui]
            bulk_delete_max = 20
            "#,
        )
        .unwrap();
        assert_eq!(config.agent.name, "screens");
        assert_eq!(config.agent.log_level, "debug");
        assert_eq!(config.ui.bulk_delete_max, 20);
        // Untouched sections keep their defaults.
        assert_eq!(config.storage.database_path, "panelio.db");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let result = load_config_from_str(
            r#"
            [agent]
            naem = "typo"
            "#,
        );
        assert!(result.is_err());
    }
}
