// SPDX-FileCopyrightText: 2026 Doshka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Doshka classifieds bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use chrono::Duration;
use doshka_core::types::ListingKind;
use serde::{Deserialize, Serialize};

/// Top-level Doshka configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values; only `telegram.bot_token` is required to actually serve.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DoshkaConfig {
    /// Bot identity and logging settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// Telegram transport settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Classifieds board behavior: page sizes, windows, categories.
    #[serde(default)]
    pub board: BoardConfig,
}

/// Bot identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Display name of the bot.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_bot_name() -> String {
    "doshka".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram transport configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. Required for `doshka serve`.
    #[serde(default)]
    pub bot_token: Option<String>,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
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
    dirs::data_dir()
        .map(|p| p.join("doshka").join("doshka.db"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "doshka.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}

/// Classifieds board behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BoardConfig {
    /// Listings per page on the owner-scoped screen.
    #[serde(default = "default_page_size")]
    pub my_page_size: u64,

    /// Listings per page when browsing a category.
    #[serde(default = "default_page_size")]
    pub view_page_size: u64,

    /// Minutes after creation during which the owner may edit.
    #[serde(default = "default_edit_window_minutes")]
    pub edit_window_minutes: i64,

    /// Days after creation at which a listing is destroyed.
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,

    /// The fixed category enumeration, selected by index.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,

    /// Glyph shown next to job listings.
    #[serde(default = "default_job_glyph")]
    pub job_glyph: String,

    /// Glyph shown next to service listings.
    #[serde(default = "default_service_glyph")]
    pub service_glyph: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            my_page_size: default_page_size(),
            view_page_size: default_page_size(),
            edit_window_minutes: default_edit_window_minutes(),
            retention_days: default_retention_days(),
            categories: default_categories(),
            job_glyph: default_job_glyph(),
            service_glyph: default_service_glyph(),
        }
    }
}

impl BoardConfig {
    /// The edit window as a duration.
    pub fn edit_window(&self) -> Duration {
        Duration::minutes(self.edit_window_minutes)
    }

    /// The retention period as a duration.
    pub fn retention(&self) -> Duration {
        Duration::days(self.retention_days)
    }

    /// The glyph configured for a listing kind.
    pub fn glyph(&self, kind: ListingKind) -> &str {
        match kind {
            ListingKind::Job => &self.job_glyph,
            ListingKind::Service => &self.service_glyph,
        }
    }

    /// The category label at `index`, when in range.
    pub fn category(&self, index: usize) -> Option<&str> {
        self.categories.get(index).map(String::as_str)
    }
}

fn default_page_size() -> u64 {
    5
}

fn default_edit_window_minutes() -> i64 {
    15
}

fn default_retention_days() -> i64 {
    30
}

fn default_categories() -> Vec<String> {
    [
        "👷 Jobs / Gigs",
        "🛠️ Household services",
        "🚗 Delivery / Transport",
        "💻 Online services",
        "💅 Beauty / Health",
        "📚 Tutoring / Education",
        "🧩 Other",
    ]
    .map(String::from)
    .to_vec()
}

fn default_job_glyph() -> String {
    "💼".to_string()
}

fn default_service_glyph() -> String {
    "🤝".to_string()
}
