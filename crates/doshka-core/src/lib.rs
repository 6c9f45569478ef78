// SPDX-FileCopyrightText: 2026 Doshka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Doshka classifieds bot.
//!
//! Provides the foundational trait definitions, error type, and common
//! types used throughout the Doshka workspace. The messaging transport and
//! the persistence backend both plug in through traits defined here.

pub mod error;
pub mod traits;
pub mod types;

pub use error::DoshkaError;
pub use traits::{ChannelGateway, ListingStore};
pub use types::{
    ChatId, Control, ControlPress, Controls, DeleteOutcome, EditOutcome, EventPayload,
    InboundEvent, Listing, ListingFilter, ListingKind, MessageId, UserId,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_construct() {
        let _config = DoshkaError::Config("test".into());
        let _store = DoshkaError::Store {
            source: Box::new(std::io::Error::other("test")),
        };
        let _gateway = DoshkaError::Gateway {
            message: "test".into(),
            source: None,
        };
        let _internal = DoshkaError::Internal("test".into());
    }

    #[test]
    fn error_display_is_prefixed() {
        let err = DoshkaError::Gateway {
            message: "edit refused".into(),
            source: None,
        };
        assert_eq!(err.to_string(), "gateway error: edit refused");
    }
}
