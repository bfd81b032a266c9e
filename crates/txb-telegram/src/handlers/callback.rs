use std::sync::Arc;

use teloxide::prelude::*;

use txb_core::{
    callback::{ActionToken, ChainToken, DeleteToken},
    context::RequestContext,
    domain::{ChatId, MessageId, MessageRef},
};

use crate::handlers::requester_name;
use crate::router::AppState;

const INVALID_DATA: &str = "Invalid callback data";

async fn answer(bot: &Bot, cb_id: &str, text: &str) -> ResponseResult<()> {
    bot.answer_callback_query(cb_id.to_string())
        .text(text.to_string())
        .await?;
    Ok(())
}

pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    let data = q.data.clone().unwrap_or_default();
    let Some(button_msg) = q.message.as_ref().map(|m| MessageRef {
        chat_id: ChatId(m.chat.id.0),
        message_id: MessageId(m.id.0),
    }) else {
        if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
            tracing::debug!(callback = %data, error = %e, "answer callback without message failed");
        }
        return Ok(());
    };

    match ActionToken::decode(&data) {
        Some(ActionToken::Chain(token)) => handle_chain(bot, &q, button_msg, token, state).await,
        Some(ActionToken::Delete(token)) => handle_delete(bot, &q, button_msg, token, state).await,
        None => {
            tracing::error!(chat_id = button_msg.chat_id.0, callback = %data, "decode callback failed");
            answer(&bot, &q.id, INVALID_DATA).await
        }
    }
}

async fn handle_chain(
    bot: Bot,
    q: &CallbackQuery,
    button_msg: MessageRef,
    token: ChainToken,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    let chat_id = button_msg.chat_id.0;
    tracing::info!(
        chat_id,
        handle = %token.handle,
        post_id = %token.post_id,
        origin = token.origin_message_id,
        "chain callback received"
    );

    if let Err(e) = answer(&bot, &q.id, "Fetching full chain...").await {
        tracing::debug!(chat_id, error = %e, "answer callback failed");
    }

    let ctx = RequestContext::with_timeout(state.cfg.chain_timeout);
    let requester = requester_name(Some(&q.from));
    match state
        .service
        .expand_chain(&ctx, button_msg, &token, requester.as_deref())
        .await
    {
        Ok(()) => tracing::info!(chat_id, post_id = %token.post_id, "chain sent"),
        Err(e) => tracing::error!(chat_id, post_id = %token.post_id, error = %e, "send chain failed"),
    }
    Ok(())
}

async fn handle_delete(
    bot: Bot,
    q: &CallbackQuery,
    button_msg: MessageRef,
    token: DeleteToken,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    let chat_id = button_msg.chat_id.0;
    tracing::info!(
        chat_id,
        origin = token.origin_message_id,
        has_chain = token.chain.is_some(),
        "delete callback received"
    );

    if let Err(e) = state.service.delete_original(button_msg, &token).await {
        tracing::debug!(chat_id, error = %e, "delete original message failed");
        return answer(&bot, &q.id, "Cannot delete message").await;
    }

    answer(&bot, &q.id, "Deleted").await?;
    tracing::info!(chat_id, "message deleted");
    Ok(())
}
