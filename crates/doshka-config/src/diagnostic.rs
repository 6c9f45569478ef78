// SPDX-FileCopyrightText: 2026 Doshka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Diagnostic rendering for configuration errors.
//!
//! Figment deserialization errors and post-deserialization validation
//! failures are converted into miette diagnostics and rendered together,
//! so a broken config surfaces every problem in one run.

use miette::Diagnostic;
use thiserror::Error;

/// A configuration error suitable for miette rendering.
#[derive(Debug, Clone, Error, Diagnostic)]
pub enum ConfigError {
    /// The configuration failed to parse or deserialize.
    #[error("configuration error: {message}")]
    #[diagnostic(
        code(doshka::config::parse),
        help("check doshka.toml and DOSHKA_* environment variables")
    )]
    Parse {
        /// Figment's description of the failure, including the offending key.
        message: String,
    },

    /// A parsed value violates a semantic constraint.
    #[error("validation error: {message}")]
    #[diagnostic(code(doshka::config::validation))]
    Validation { message: String },
}

/// Converts a figment error (which may aggregate several failures) into
/// one [`ConfigError`] per failure.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    err.into_iter()
        .map(|e| ConfigError::Parse {
            message: e.to_string(),
        })
        .collect()
}

/// Renders all collected errors to stderr via miette.
pub fn render_errors(errors: &[ConfigError]) {
    for error in errors {
        eprintln!("{:?}", miette::Report::new(error.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn figment_error_becomes_parse_errors() {
        let err = crate::loader::load_config_from_str("[board]\nmy_page_size = \"lots\"\n")
            .unwrap_err();
        let errors = figment_to_config_errors(err);
        assert!(!errors.is_empty());
        assert!(matches!(errors[0], ConfigError::Parse { .. }));
    }

    #[test]
    fn validation_error_displays_message() {
        let err = ConfigError::Validation {
            message: "board.categories must not be empty".into(),
        };
        assert!(err.to_string().contains("categories"));
    }
}
