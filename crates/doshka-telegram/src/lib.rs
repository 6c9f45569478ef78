// SPDX-FileCopyrightText: 2026 Doshka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel gateway for the Doshka classifieds bot.
//!
//! Connects to the Telegram Bot API via teloxide long polling, decodes
//! messages and callback presses into [`InboundEvent`]s, and implements
//! the outbound [`ChannelGateway`] with inline keyboards, MarkdownV2
//! escaping, and explicit no-op/not-found/rejected edit outcomes.

pub mod events;
pub mod markdown;

use async_trait::async_trait;
use doshka_config::model::TelegramConfig;
use doshka_core::types::{
    ChatId, ControlPress, Controls, DeleteOutcome, EditOutcome, InboundEvent, MessageId,
};
use doshka_core::{ChannelGateway, DoshkaError};
use teloxide::dptree;
use teloxide::prelude::*;
use teloxide::types::{
    ChatId as TgChatId, InlineKeyboardButton, InlineKeyboardMarkup, MessageId as TgMessageId,
    ParseMode, Recipient,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Telegram gateway over long polling.
///
/// Inbound updates are decoded by a background dispatcher task and queued;
/// the host loop drains them through [`TelegramGateway::next_event`].
pub struct TelegramGateway {
    bot: Bot,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundEvent>>,
    inbound_tx: mpsc::Sender<InboundEvent>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TelegramGateway {
    /// Creates a new Telegram gateway. Requires `config.bot_token`.
    pub fn new(config: &TelegramConfig) -> Result<Self, DoshkaError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            DoshkaError::Config("telegram.bot_token is required for the Telegram gateway".into())
        })?;

        if token.is_empty() {
            return Err(DoshkaError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        let (inbound_tx, inbound_rx) = mpsc::channel(100);

        Ok(Self {
            bot,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// Starts the long-polling dispatcher task. Idempotent.
    pub fn connect(&mut self) {
        if self.polling_handle.is_some() {
            return;
        }

        let bot = self.bot.clone();
        let message_tx = self.inbound_tx.clone();
        let callback_tx = self.inbound_tx.clone();

        info!("starting Telegram long polling");

        let handle = tokio::spawn(async move {
            let handler = dptree::entry()
                .branch(Update::filter_message().endpoint(move |msg: Message| {
                    let tx = message_tx.clone();
                    async move {
                        match events::message_event(&msg) {
                            Some(event) => {
                                if tx.send(event).await.is_err() {
                                    warn!("inbound queue closed, dropping message");
                                }
                            }
                            None => {
                                debug!(msg_id = msg.id.0, "ignoring unsupported message");
                            }
                        }
                        respond(())
                    }
                }))
                .branch(Update::filter_callback_query().endpoint(
                    move |bot: Bot, query: CallbackQuery| {
                        let tx = callback_tx.clone();
                        async move {
                            // Acknowledge immediately so the client stops
                            // its progress spinner.
                            if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
                                debug!(error = %e, "failed to answer callback query");
                            }
                            match events::callback_event(&query) {
                                Some(event) => {
                                    if tx.send(event).await.is_err() {
                                        warn!("inbound queue closed, dropping callback");
                                    }
                                }
                                None => {
                                    debug!("ignoring callback without data or message");
                                }
                            }
                            respond(())
                        }
                    },
                ));

            Dispatcher::builder(bot, handler)
                .default_handler(|_| async {}) // Silently ignore other update kinds
                .build()
                .dispatch()
                .await;
        });

        self.polling_handle = Some(handle);
    }

    /// Awaits the next decoded inbound event.
    pub async fn next_event(&self) -> Result<InboundEvent, DoshkaError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await.ok_or_else(|| DoshkaError::Gateway {
            message: "Telegram inbound queue closed".into(),
            source: None,
        })
    }
}

/// Builds an inline keyboard from interface controls.
fn keyboard(controls: &Controls) -> Option<InlineKeyboardMarkup> {
    if controls.is_empty() {
        return None;
    }
    let rows: Vec<Vec<InlineKeyboardButton>> = controls
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|control| match &control.press {
                    ControlPress::Action(data) => {
                        InlineKeyboardButton::callback(control.label.clone(), data.clone())
                    }
                    ControlPress::Link(link) => match url::Url::parse(link) {
                        Ok(parsed) => InlineKeyboardButton::url(control.label.clone(), parsed),
                        Err(e) => {
                            warn!(link = link.as_str(), error = %e, "invalid control link");
                            InlineKeyboardButton::callback(control.label.clone(), "noop".to_string())
                        }
                    },
                })
                .collect()
        })
        .collect();
    Some(InlineKeyboardMarkup::new(rows))
}

/// Maps a failed edit to an outcome or a genuine transport error.
///
/// The no-op case ("message is not modified") is success, never an error;
/// a vanished target triggers the renderer's fallback send; any other API
/// rejection (content validation and the like) does too. Only transport
/// failures propagate as errors.
fn classify_edit_error(e: teloxide::RequestError) -> Result<EditOutcome, DoshkaError> {
    let text = e.to_string();
    if text.contains("message is not modified") {
        return Ok(EditOutcome::Unchanged);
    }
    if text.contains("message to edit not found") || text.contains("message can't be edited") {
        return Ok(EditOutcome::NotFound);
    }
    if matches!(e, teloxide::RequestError::Api(_)) {
        warn!(error = %e, "edit rejected by Telegram");
        return Ok(EditOutcome::Rejected);
    }
    Err(DoshkaError::Gateway {
        message: format!("failed to edit message: {e}"),
        source: Some(Box::new(e)),
    })
}

#[async_trait]
impl ChannelGateway for TelegramGateway {
    async fn send(
        &self,
        chat: ChatId,
        text: &str,
        controls: &Controls,
    ) -> Result<MessageId, DoshkaError> {
        let escaped = markdown::escape_markdown_v2(text);

        let mut request = self
            .bot
            .send_message(Recipient::Id(TgChatId(chat.0)), &escaped)
            .parse_mode(ParseMode::MarkdownV2);
        if let Some(kb) = keyboard(controls) {
            request = request.reply_markup(kb);
        }

        match request.await {
            Ok(sent) => Ok(MessageId(i64::from(sent.id.0))),
            Err(e) => {
                // MarkdownV2 is strict; fall back to plain text rather than
                // lose the screen.
                warn!(error = %e, "MarkdownV2 send failed, sending as plain text");
                let mut request = self.bot.send_message(Recipient::Id(TgChatId(chat.0)), text);
                if let Some(kb) = keyboard(controls) {
                    request = request.reply_markup(kb);
                }
                let sent = request.await.map_err(|e| DoshkaError::Gateway {
                    message: format!("failed to send message: {e}"),
                    source: Some(Box::new(e)),
                })?;
                Ok(MessageId(i64::from(sent.id.0)))
            }
        }
    }

    async fn edit(
        &self,
        chat: ChatId,
        message: MessageId,
        text: &str,
        controls: &Controls,
    ) -> Result<EditOutcome, DoshkaError> {
        let escaped = markdown::escape_markdown_v2(text);
        let msg_id = TgMessageId(message.0 as i32);

        let mut request = self
            .bot
            .edit_message_text(TgChatId(chat.0), msg_id, &escaped)
            .parse_mode(ParseMode::MarkdownV2);
        if let Some(kb) = keyboard(controls) {
            request = request.reply_markup(kb);
        }

        match request.await {
            Ok(_) => Ok(EditOutcome::Edited),
            Err(e) => classify_edit_error(e),
        }
    }

    async fn delete(
        &self,
        chat: ChatId,
        message: MessageId,
    ) -> Result<DeleteOutcome, DoshkaError> {
        let msg_id = TgMessageId(message.0 as i32);
        match self.bot.delete_message(TgChatId(chat.0), msg_id).await {
            Ok(_) => Ok(DeleteOutcome::Deleted),
            Err(e) if matches!(e, teloxide::RequestError::Api(_)) => {
                // Already gone or undeletable; either way the screen is not
                // coming back.
                debug!(error = %e, "delete reported failure, treating as missing");
                Ok(DeleteOutcome::NotFound)
            }
            Err(e) => Err(DoshkaError::Gateway {
                message: format!("failed to delete message: {e}"),
                source: Some(Box::new(e)),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doshka_core::types::Control;

    #[test]
    fn new_requires_bot_token() {
        let config = TelegramConfig { bot_token: None };
        assert!(TelegramGateway::new(&config).is_err());
    }

    #[test]
    fn new_rejects_empty_token() {
        let config = TelegramConfig {
            bot_token: Some(String::new()),
        };
        assert!(TelegramGateway::new(&config).is_err());
    }

    #[test]
    fn new_accepts_valid_token() {
        let config = TelegramConfig {
            bot_token: Some("123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11".into()),
        };
        assert!(TelegramGateway::new(&config).is_ok());
    }

    #[test]
    fn keyboard_preserves_rows_and_labels() {
        let controls = Controls::new()
            .row(vec![
                Control::action("A", "a"),
                Control::action("B", "b"),
            ])
            .row(vec![Control::link("Site", "https://example.com/")]);
        let kb = keyboard(&controls).unwrap();
        assert_eq!(kb.inline_keyboard.len(), 2);
        assert_eq!(kb.inline_keyboard[0].len(), 2);
        assert_eq!(kb.inline_keyboard[0][0].text, "A");
        assert_eq!(kb.inline_keyboard[1][0].text, "Site");
    }

    #[test]
    fn keyboard_is_omitted_when_empty() {
        assert!(keyboard(&Controls::new()).is_none());
    }

    #[test]
    fn invalid_link_degrades_to_inert_button() {
        let controls = Controls::new().row(vec![Control::link("Bad", "not a url")]);
        let kb = keyboard(&controls).unwrap();
        // The button still renders; it just does nothing.
        assert_eq!(kb.inline_keyboard[0][0].text, "Bad");
    }
}
