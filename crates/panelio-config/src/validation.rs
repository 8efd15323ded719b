// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation of configuration values.

use crate::diagnostic::ConfigError;
use crate::model::PanelioConfig;

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized config; collects every failure rather than
/// stopping at the first.
pub fn validate_config(config: &PanelioConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !VALID_LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.log_level `{}` is not one of {}",
                config.agent.log_level,
                VALID_LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.storage.database_path.is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.ui.bulk_delete_max == 0 || config.ui.bulk_delete_max > 100 {
        errors.push(ConfigError::Validation {
            message: format!(
                "ui.bulk_delete_max must be between 1 and 100, got {}",
                config.ui.bulk_delete_max
            ),
        });
    }

    if config.ui.default_deletion_hours == Some(0) {
        errors.push(ConfigError::Validation {
            message: "ui.default_deletion_hours must be at least 1 when set".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&PanelioConfig::default()).is_ok());
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let mut config = PanelioConfig::default();
        config.agent.log_level = "loud".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn all_failures_are_collected() {
        let mut config = PanelioConfig::default();
        config.agent.log_level = "loud".into();
        config.storage.database_path = String::new();
        config.ui.bulk_delete_max = 0;
        config.ui.default_deletion_hours = Some(0);
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }
}
