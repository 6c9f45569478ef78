// SPDX-FileCopyrightText: 2026 Doshka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel gateway trait for the messaging transport.

use async_trait::async_trait;

use crate::error::DoshkaError;
use crate::types::{ChatId, Controls, DeleteOutcome, EditOutcome, MessageId};

/// Outbound half of the messaging transport.
///
/// The gateway carries no dialogue knowledge: action strings inside
/// [`Controls`] are opaque to it and decoded by the dialogue controller.
/// Errors from this trait are transport failures only; refused edits and
/// missing messages are reported as outcomes, not errors, so the renderer
/// can fall back without guessing at error strings.
#[async_trait]
pub trait ChannelGateway {
    /// Sends a new message and returns its identity.
    async fn send(
        &self,
        chat: ChatId,
        text: &str,
        controls: &Controls,
    ) -> Result<MessageId, DoshkaError>;

    /// Replaces the text and controls of an existing message in place.
    async fn edit(
        &self,
        chat: ChatId,
        message: MessageId,
        text: &str,
        controls: &Controls,
    ) -> Result<EditOutcome, DoshkaError>;

    /// Removes a message.
    async fn delete(
        &self,
        chat: ChatId,
        message: MessageId,
    ) -> Result<DeleteOutcome, DoshkaError>;
}
