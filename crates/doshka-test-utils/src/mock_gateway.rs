// SPDX-FileCopyrightText: 2026 Doshka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel gateway for deterministic testing.
//!
//! `MockGateway` implements [`ChannelGateway`] against an in-memory message
//! table that behaves like the real transport: editing a missing message
//! reports `NotFound`, editing with identical content reports `Unchanged`.
//! Individual outcomes can also be scripted to exercise fallback paths.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::Mutex;

use doshka_core::types::{ChatId, Controls, DeleteOutcome, EditOutcome, MessageId};
use doshka_core::{ChannelGateway, DoshkaError};

#[derive(Default)]
struct Inner {
    next_id: i64,
    /// Live messages: (chat, message) -> (text, controls).
    messages: HashMap<(i64, i64), (String, Controls)>,
    /// Content most recently rendered per chat, by send or successful edit.
    rendered: HashMap<i64, (String, Controls)>,
    send_count: usize,
    edit_count: usize,
    /// Outcomes to force on upcoming edit calls, ahead of table behavior.
    forced_edits: VecDeque<EditOutcome>,
    fail_next_send: bool,
    fail_next_edit: bool,
}

/// An in-memory messaging transport double.
#[derive(Default)]
pub struct MockGateway {
    inner: Mutex<Inner>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces the next `edit` call to report `outcome` without consulting
    /// the message table.
    pub async fn force_edit_outcome(&self, outcome: EditOutcome) {
        self.inner.lock().await.forced_edits.push_back(outcome);
    }

    /// Makes the next `send` fail with a gateway error.
    pub async fn fail_next_send(&self) {
        self.inner.lock().await.fail_next_send = true;
    }

    /// Makes the next `edit` fail with a gateway error.
    pub async fn fail_next_edit(&self) {
        self.inner.lock().await.fail_next_edit = true;
    }

    /// Simulates the user deleting a message out from under the bot.
    pub async fn drop_message(&self, chat: ChatId, message: MessageId) {
        self.inner.lock().await.messages.remove(&(chat.0, message.0));
    }

    /// Number of messages currently existing in `chat`.
    pub async fn message_count(&self, chat: ChatId) -> usize {
        self.inner
            .lock()
            .await
            .messages
            .keys()
            .filter(|(c, _)| *c == chat.0)
            .count()
    }

    /// Total `send` calls observed.
    pub async fn send_count(&self) -> usize {
        self.inner.lock().await.send_count
    }

    /// Total `edit` calls observed.
    pub async fn edit_count(&self) -> usize {
        self.inner.lock().await.edit_count
    }

    /// The text most recently rendered into `chat`.
    pub async fn rendered_text(&self, chat: ChatId) -> Option<String> {
        self.inner
            .lock()
            .await
            .rendered
            .get(&chat.0)
            .map(|(text, _)| text.clone())
    }

    /// The controls most recently rendered into `chat`.
    pub async fn rendered_controls(&self, chat: ChatId) -> Option<Controls> {
        self.inner
            .lock()
            .await
            .rendered
            .get(&chat.0)
            .map(|(_, controls)| controls.clone())
    }

    /// All action strings reachable from the most recently rendered controls.
    pub async fn rendered_actions(&self, chat: ChatId) -> Vec<String> {
        self.rendered_controls(chat)
            .await
            .map(|controls| {
                controls
                    .rows
                    .iter()
                    .flatten()
                    .filter_map(|c| match &c.press {
                        doshka_core::types::ControlPress::Action(a) => Some(a.clone()),
                        doshka_core::types::ControlPress::Link(_) => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChannelGateway for MockGateway {
    async fn send(
        &self,
        chat: ChatId,
        text: &str,
        controls: &Controls,
    ) -> Result<MessageId, DoshkaError> {
        let mut inner = self.inner.lock().await;
        if std::mem::take(&mut inner.fail_next_send) {
            return Err(DoshkaError::Gateway {
                message: "scripted send failure".into(),
                source: None,
            });
        }
        inner.next_id += 1;
        let id = inner.next_id;
        inner
            .messages
            .insert((chat.0, id), (text.to_string(), controls.clone()));
        inner
            .rendered
            .insert(chat.0, (text.to_string(), controls.clone()));
        inner.send_count += 1;
        Ok(MessageId(id))
    }

    async fn edit(
        &self,
        chat: ChatId,
        message: MessageId,
        text: &str,
        controls: &Controls,
    ) -> Result<EditOutcome, DoshkaError> {
        let mut inner = self.inner.lock().await;
        inner.edit_count += 1;
        if std::mem::take(&mut inner.fail_next_edit) {
            return Err(DoshkaError::Gateway {
                message: "scripted edit failure".into(),
                source: None,
            });
        }
        if let Some(forced) = inner.forced_edits.pop_front() {
            if forced == EditOutcome::Edited {
                inner
                    .messages
                    .insert((chat.0, message.0), (text.to_string(), controls.clone()));
                inner
                    .rendered
                    .insert(chat.0, (text.to_string(), controls.clone()));
            }
            return Ok(forced);
        }
        match inner.messages.get(&(chat.0, message.0)) {
            None => Ok(EditOutcome::NotFound),
            Some((old_text, old_controls)) if old_text == text && old_controls == controls => {
                Ok(EditOutcome::Unchanged)
            }
            Some(_) => {
                inner
                    .messages
                    .insert((chat.0, message.0), (text.to_string(), controls.clone()));
                inner
                    .rendered
                    .insert(chat.0, (text.to_string(), controls.clone()));
                Ok(EditOutcome::Edited)
            }
        }
    }

    async fn delete(
        &self,
        chat: ChatId,
        message: MessageId,
    ) -> Result<DeleteOutcome, DoshkaError> {
        let mut inner = self.inner.lock().await;
        match inner.messages.remove(&(chat.0, message.0)) {
            Some(_) => Ok(DeleteOutcome::Deleted),
            None => Ok(DeleteOutcome::NotFound),
        }
    }
}
