// SPDX-FileCopyrightText: 2026 Doshka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes. Collects every failure instead of failing fast.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::DoshkaConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &DoshkaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.bot.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "bot.log_level must be one of {LOG_LEVELS:?}, got `{}`",
                config.bot.log_level
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.board.my_page_size == 0 {
        errors.push(ConfigError::Validation {
            message: "board.my_page_size must be positive".to_string(),
        });
    }

    if config.board.view_page_size == 0 {
        errors.push(ConfigError::Validation {
            message: "board.view_page_size must be positive".to_string(),
        });
    }

    if config.board.edit_window_minutes < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "board.edit_window_minutes must be at least 1, got {}",
                config.board.edit_window_minutes
            ),
        });
    }

    if config.board.retention_days < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "board.retention_days must be at least 1, got {}",
                config.board.retention_days
            ),
        });
    }

    if config.board.categories.is_empty() {
        errors.push(ConfigError::Validation {
            message: "board.categories must not be empty".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for (i, category) in config.board.categories.iter().enumerate() {
        if category.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("board.categories[{i}] must not be empty"),
            });
        }
        if !seen.insert(category) {
            errors.push(ConfigError::Validation {
                message: format!("duplicate category `{category}` in board.categories"),
            });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = DoshkaConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_page_size_fails_validation() {
        let mut config = DoshkaConfig::default();
        config.board.view_page_size = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("view_page_size"))
        ));
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = DoshkaConfig::default();
        config.storage.database_path = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))
        ));
    }

    #[test]
    fn empty_categories_fails_validation() {
        let mut config = DoshkaConfig::default();
        config.board.categories.clear();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("categories"))
        ));
    }

    #[test]
    fn duplicate_categories_fail_validation() {
        let mut config = DoshkaConfig::default();
        config.board.categories = vec!["A".into(), "B".into(), "A".into()];
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("duplicate category"))
        ));
    }

    #[test]
    fn bad_log_level_fails_validation() {
        let mut config = DoshkaConfig::default();
        config.bot.log_level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("log_level"))
        ));
    }

    #[test]
    fn collects_multiple_errors_at_once() {
        let mut config = DoshkaConfig::default();
        config.board.my_page_size = 0;
        config.board.retention_days = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 2);
    }
}
