// SPDX-FileCopyrightText: 2026 Doshka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dialogue-local rejections.
//!
//! A [`Rejection`] is recovered inside the controller by re-rendering a
//! screen with a notice; it never crosses an adapter boundary and is
//! deliberately not a [`doshka_core::DoshkaError`] variant. Infrastructure
//! failures and user-input problems must not share a type.

/// Why a user action was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Bad input; the same input screen is re-rendered with the message.
    Validation(String),
    /// Edit attempted outside the ownership/edit-window gate.
    Unauthorized,
    /// The listing vanished between being listed and being acted on.
    NotFound,
    /// A control arrived while the session had no recorded step.
    StaleSession,
}

impl Rejection {
    /// User-facing notice line rendered above the recovered screen.
    pub fn notice(&self) -> String {
        match self {
            Rejection::Validation(message) => format!("⚠️ {message}"),
            Rejection::Unauthorized => {
                "⛔ The editing window for this listing has closed.".to_string()
            }
            Rejection::NotFound => "🤷 That listing no longer exists.".to_string(),
            Rejection::StaleSession => {
                "🔄 That screen was out of date, so here is a fresh start.".to_string()
            }
        }
    }
}
