// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Panelio configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default sensibly.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PanelioConfig {
    /// Process identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Chat-platform transport settings.
    #[serde(default)]
    pub transport: TransportConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Screen/UI behavior settings.
    #[serde(default)]
    pub ui: UiConfig,
}

/// Process identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "panelio".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Chat-platform transport configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TransportConfig {
    /// Platform bot token. `None` leaves the transport unconfigured.
    #[serde(default)]
    pub token: Option<String>,

    /// Reconnect on gateway drop.
    #[serde(default)]
    pub reconnect: bool,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Use WAL journal mode.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    "panelio.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// Screen/UI behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UiConfig {
    /// Fallback self-deletion delay (hours) for screens that do not declare
    /// their own and have no per-guild option set.
    #[serde(default)]
    pub default_deletion_hours: Option<u64>,

    /// Upper bound accepted by the mention "clear N" bulk delete.
    #[serde(default = "default_bulk_delete_max")]
    pub bulk_delete_max: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_deletion_hours: None,
            bulk_delete_max: default_bulk_delete_max(),
        }
    }
}

fn default_bulk_delete_max() -> usize {
    50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = PanelioConfig::default();
        assert_eq!(config.agent.name, "panelio");
        assert_eq!(config.agent.log_level, "info");
        assert_eq!(config.storage.database_path, "panelio.db");
        assert!(config.storage.wal_mode);
        assert!(config.transport.token.is_none());
        assert_eq!(config.ui.bulk_delete_max, 50);
    }
}
