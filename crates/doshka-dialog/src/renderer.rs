// SPDX-FileCopyrightText: 2026 Doshka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The interface renderer: one live message per conversation.
//!
//! Every transition replaces the content of the conversation's single
//! interface message instead of accumulating new messages. The renderer
//! owns the message-identity bookkeeping: `Session::live_message` is
//! mutated here and nowhere else.

use std::sync::Arc;

use doshka_core::types::{ChatId, EditOutcome, MessageId};
use doshka_core::ChannelGateway;
use tracing::{debug, error, warn};

use crate::screens::Screen;
use crate::session::Session;

pub struct InterfaceRenderer {
    gateway: Arc<dyn ChannelGateway + Send + Sync>,
}

impl InterfaceRenderer {
    pub fn new(gateway: Arc<dyn ChannelGateway + Send + Sync>) -> Self {
        Self { gateway }
    }

    /// Presents `screen` as the conversation's live interface.
    ///
    /// Edits the live message in place when one exists; a byte-identical
    /// no-op counts as success. When the message is gone or the transport
    /// refuses the edit, falls back to sending a new message and records
    /// its identity. Transport failures are logged for the operator and
    /// absorbed: the controller never sees a render error, at worst the
    /// user's screen stays stale.
    pub async fn present(&self, chat: ChatId, session: &mut Session, screen: &Screen) {
        if let Some(live) = session.live_message {
            match self
                .gateway
                .edit(chat, live, &screen.text, &screen.controls)
                .await
            {
                Ok(EditOutcome::Edited) | Ok(EditOutcome::Unchanged) => return,
                Ok(EditOutcome::NotFound) => {
                    debug!(chat_id = chat.0, "live message gone, sending a new one");
                }
                Ok(EditOutcome::Rejected) => {
                    warn!(chat_id = chat.0, "edit rejected by transport, sending a new one");
                }
                Err(e) => {
                    error!(chat_id = chat.0, error = %e, "failed to edit interface message");
                    return;
                }
            }
        }

        match self
            .gateway
            .send(chat, &screen.text, &screen.controls)
            .await
        {
            Ok(id) => session.live_message = Some(id),
            Err(e) => {
                error!(chat_id = chat.0, error = %e, "failed to send interface message");
            }
        }
    }

    /// Removes a stale screen. Best effort: a missing message is already
    /// what we want. Clears `live_message` when it pointed at the removed
    /// message, keeping identity bookkeeping inside the renderer.
    pub async fn discard(&self, chat: ChatId, session: &mut Session, message: MessageId) {
        if let Err(e) = self.gateway.delete(chat, message).await {
            debug!(chat_id = chat.0, error = %e, "failed to delete stale message");
        }
        if session.live_message == Some(message) {
            session.live_message = None;
        }
    }
}
