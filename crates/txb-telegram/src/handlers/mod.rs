//! Telegram update handlers.
//!
//! Each handler turns one update into a `PostService` call under its own
//! request deadline and never fails the dispatcher: errors are logged and, where the
//! user is waiting on a button, reported through the callback answer.

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, InlineQuery, Message, User},
};

use crate::router::AppState;

mod callback;
mod inline;
mod message;
mod start;

pub use start::HELP_TEXT;

pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    callback::handle_callback(bot, q, state).await
}

pub async fn handle_inline_query(
    bot: Bot,
    q: InlineQuery,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    inline::handle_inline_query(bot, q, state).await
}

pub async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    match command_name(text) {
        Some("start") | Some("help") => return start::handle_start(bot, msg).await,
        Some(_) => return Ok(()),
        None => {}
    }

    message::handle_post_link(bot, msg, state).await
}

/// `/start`, `/help@twitter_x_bot args` → `start`, `help`.
fn command_name(text: &str) -> Option<&str> {
    let cmd = text.trim_start().strip_prefix('/')?;
    let cmd = cmd.split_whitespace().next().unwrap_or("");
    let name = cmd.split('@').next().unwrap_or("");
    if name.is_empty() {
        return None;
    }
    Some(name)
}

/// Name shown in "Requested by": full name, else `@username`.
pub fn requester_name(user: Option<&User>) -> Option<String> {
    let user = user?;
    let full = format!(
        "{} {}",
        user.first_name,
        user.last_name.as_deref().unwrap_or("")
    );
    let full = full.trim();
    if !full.is_empty() {
        return Some(full.to_string());
    }
    user.username
        .as_deref()
        .filter(|u| !u.is_empty())
        .map(|u| format!("@{u}"))
}
