// SPDX-FileCopyrightText: 2026 Doshka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Doshka classifieds bot.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, environment variable
//! overrides, and miette-rendered diagnostics.
//!
//! # Usage
//!
//! ```no_run
//! use doshka_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Bot name: {}", config.bot.name);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::DoshkaConfig;

/// Load configuration from the XDG hierarchy and validate it.
///
/// Returns either a valid [`DoshkaConfig`] or the list of diagnostics.
pub fn load_and_validate() -> Result<DoshkaConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<DoshkaConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_inline_config_loads() {
        let config = load_and_validate_str(
            r#"
[telegram]
bot_token = "123456:TEST"

[board]
view_page_size = 3
"#,
        )
        .unwrap();
        assert_eq!(config.telegram.bot_token.as_deref(), Some("123456:TEST"));
        assert_eq!(config.board.view_page_size, 3);
    }

    #[test]
    fn invalid_inline_config_reports_validation() {
        let errors = load_and_validate_str("[board]\nretention_days = 0\n").unwrap_err();
        assert!(
            errors
                .iter()
                .any(|e| matches!(e, ConfigError::Validation { .. }))
        );
    }

    #[test]
    fn unknown_key_reports_parse_error() {
        let errors = load_and_validate_str("[telegram]\ntoken = \"x\"\n").unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ConfigError::Parse { .. })));
    }
}
