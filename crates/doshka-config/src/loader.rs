// SPDX-FileCopyrightText: 2026 Doshka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./doshka.toml` > `~/.config/doshka/doshka.toml`
//! > `/etc/doshka/doshka.toml`, with environment variable overrides via the
//! `DOSHKA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::DoshkaConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/doshka/doshka.toml` (system-wide)
/// 3. `~/.config/doshka/doshka.toml` (user XDG config)
/// 4. `./doshka.toml` (local directory)
/// 5. `DOSHKA_*` environment variables
pub fn load_config() -> Result<DoshkaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DoshkaConfig::default()))
        .merge(Toml::file("/etc/doshka/doshka.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("doshka/doshka.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("doshka.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<DoshkaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DoshkaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<DoshkaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DoshkaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `DOSHKA_TELEGRAM_BOT_TOKEN` must map to
/// `telegram.bot_token`, not `telegram.bot.token`. Only the leading section
/// name is rewritten; underscores in the rest of the key are preserved.
fn env_provider() -> Env {
    Env::prefixed("DOSHKA_").map(|key| {
        // `key` is the lowercased env var name with the prefix stripped.
        // Example: DOSHKA_TELEGRAM_BOT_TOKEN -> "telegram_bot_token"
        let key_str = key.as_str();
        for section in ["bot", "telegram", "storage", "board"] {
            if let Some(rest) = key_str.strip_prefix(&format!("{section}_")) {
                return format!("{section}.{rest}").into();
            }
        }
        key_str.to_string().into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_loader_applies_overrides() {
        let config = load_config_from_str(
            r#"
[bot]
log_level = "debug"

[board]
retention_days = 7
"#,
        )
        .unwrap();
        assert_eq!(config.bot.log_level, "debug");
        assert_eq!(config.board.retention_days, 7);
        // Untouched sections keep their defaults.
        assert_eq!(config.board.my_page_size, 5);
    }

    #[test]
    fn string_loader_rejects_unknown_section() {
        let result = load_config_from_str("[mystery]\nkey = 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn empty_string_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.bot.name, "doshka");
    }
}
