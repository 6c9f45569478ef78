// SPDX-FileCopyrightText: 2026 Doshka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Doshka classifieds bot.

use thiserror::Error;

/// The primary error type used across adapter traits and core operations.
///
/// Dialogue-level rejections (bad input, expired edit window, vanished
/// listing) are deliberately not represented here -- they are recovered
/// inside the dialogue controller and never cross an adapter boundary.
#[derive(Debug, Error)]
pub enum DoshkaError {
    /// Configuration errors (invalid TOML, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure).
    #[error("store error: {source}")]
    Store {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Channel gateway errors (connection failure, message delivery).
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
