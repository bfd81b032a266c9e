//! Telegram adapter (teloxide).
//!
//! Implements the `txb-core` TransportPort over the Telegram Bot API and wires the
//! update handlers.

use std::future::IntoFuture;

use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{
        InlineKeyboardButton, InlineKeyboardMarkup, InputFile, InputMedia, InputMediaPhoto,
        ParseMode,
    },
};

pub mod convert;
pub mod handlers;
pub mod router;

use txb_core::{
    domain::{ChatId, MessageId, MessageRef},
    errors::Error,
    messaging::{
        port::TransportPort,
        types::{GroupPhoto, InlineKeyboard, Outgoing, PhotoPayload, VideoPayload},
    },
    Result,
};

#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub fn bot(&self) -> Bot {
        self.bot.clone()
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn tg_msg_id(message_id: MessageId) -> teloxide::types::MessageId {
        teloxide::types::MessageId(message_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::Transport(format!("telegram error: {e}"))
    }

    async fn call<T, R>(req: R) -> Result<T>
    where
        R: IntoFuture<Output = std::result::Result<T, teloxide::RequestError>>,
    {
        req.await.map_err(Self::map_err)
    }
}

pub fn keyboard_markup(keyboard: &InlineKeyboard) -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = keyboard
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.callback_data.clone()))
                .collect()
        })
        .collect();
    InlineKeyboardMarkup::new(rows)
}

pub fn media_url(raw: &str) -> Result<reqwest::Url> {
    reqwest::Url::parse(raw).map_err(|e| Error::Transport(format!("invalid media url {raw:?}: {e}")))
}

#[async_trait]
impl TransportPort for TelegramTransport {
    async fn send_video(
        &self,
        chat_id: ChatId,
        video: VideoPayload,
        out: Outgoing,
    ) -> Result<MessageId> {
        let mut req = self
            .bot
            .send_video(Self::tg_chat(chat_id), InputFile::url(media_url(&video.url)?))
            .caption(video.caption)
            .parse_mode(ParseMode::Html)
            .allow_sending_without_reply(true);
        if video.width > 0 && video.height > 0 {
            req = req.width(video.width).height(video.height);
        }
        if let Some(reply_to) = out.reply_to {
            req = req.reply_to_message_id(Self::tg_msg_id(reply_to));
        }
        if let Some(kb) = out.keyboard.as_ref() {
            req = req.reply_markup(keyboard_markup(kb));
        }

        let msg = Self::call(req).await?;
        Ok(MessageId(msg.id.0))
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        photo: PhotoPayload,
        out: Outgoing,
    ) -> Result<MessageId> {
        let mut req = self
            .bot
            .send_photo(Self::tg_chat(chat_id), InputFile::url(media_url(&photo.url)?))
            .caption(photo.caption)
            .parse_mode(ParseMode::Html)
            .allow_sending_without_reply(true);
        if let Some(reply_to) = out.reply_to {
            req = req.reply_to_message_id(Self::tg_msg_id(reply_to));
        }
        if let Some(kb) = out.keyboard.as_ref() {
            req = req.reply_markup(keyboard_markup(kb));
        }

        let msg = Self::call(req).await?;
        Ok(MessageId(msg.id.0))
    }

    async fn send_photo_group(
        &self,
        chat_id: ChatId,
        photos: Vec<GroupPhoto>,
        out: Outgoing,
    ) -> Result<MessageId> {
        let mut media = Vec::with_capacity(photos.len());
        for p in photos {
            let mut item = InputMediaPhoto::new(InputFile::url(media_url(&p.url)?));
            if let Some(caption) = p.caption {
                item = item.caption(caption).parse_mode(ParseMode::Html);
            }
            media.push(InputMedia::Photo(item));
        }

        let mut req = self
            .bot
            .send_media_group(Self::tg_chat(chat_id), media)
            .allow_sending_without_reply(true);
        if let Some(reply_to) = out.reply_to {
            req = req.reply_to_message_id(Self::tg_msg_id(reply_to));
        }

        let msgs = Self::call(req).await?;
        let first = msgs
            .first()
            .ok_or_else(|| Error::Transport("telegram returned an empty media group".to_string()))?;
        Ok(MessageId(first.id.0))
    }

    async fn send_text(&self, chat_id: ChatId, html: &str, out: Outgoing) -> Result<MessageId> {
        let mut req = self
            .bot
            .send_message(Self::tg_chat(chat_id), html.to_string())
            .parse_mode(ParseMode::Html)
            .allow_sending_without_reply(true);
        if let Some(reply_to) = out.reply_to {
            req = req.reply_to_message_id(Self::tg_msg_id(reply_to));
        }
        if let Some(kb) = out.keyboard.as_ref() {
            req = req.reply_markup(keyboard_markup(kb));
        }

        let msg = Self::call(req).await?;
        Ok(MessageId(msg.id.0))
    }

    async fn delete_message(&self, msg: MessageRef) -> Result<()> {
        Self::call(
            self.bot
                .delete_message(Self::tg_chat(msg.chat_id), Self::tg_msg_id(msg.message_id)),
        )
        .await?;
        Ok(())
    }

    async fn edit_keyboard(&self, msg: MessageRef, keyboard: Option<InlineKeyboard>) -> Result<()> {
        let markup = keyboard
            .as_ref()
            .map(keyboard_markup)
            .unwrap_or_default();
        Self::call(
            self.bot
                .edit_message_reply_markup(
                    Self::tg_chat(msg.chat_id),
                    Self::tg_msg_id(msg.message_id),
                )
                .reply_markup(markup),
        )
        .await?;
        Ok(())
    }

    async fn send_typing(&self, chat_id: ChatId) -> Result<()> {
        Self::call(
            self.bot
                .send_chat_action(Self::tg_chat(chat_id), teloxide::types::ChatAction::Typing),
        )
        .await?;
        Ok(())
    }
}
