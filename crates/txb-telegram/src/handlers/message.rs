use std::sync::Arc;

use teloxide::prelude::*;

use txb_core::{
    context::RequestContext,
    domain::{ChatId, MessageId},
    url_parser::parse_post_url,
};

use crate::handlers::requester_name;
use crate::router::AppState;

pub async fn handle_post_link(_bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let chat_id = ChatId(msg.chat.id.0);

    let Some(post_ref) = parse_post_url(text.trim()) else {
        tracing::debug!(chat_id = chat_id.0, "message ignored: no post url");
        return Ok(());
    };
    tracing::info!(
        chat_id = chat_id.0,
        handle = %post_ref.handle,
        post_id = %post_ref.post_id,
        "post url parsed"
    );

    let ctx = RequestContext::with_timeout(state.cfg.message_timeout);
    state.service.notify_typing(chat_id).await;

    let requester = requester_name(msg.from());
    match state
        .service
        .send_post(&ctx, chat_id, MessageId(msg.id.0), &post_ref, requester.as_deref())
        .await
    {
        Ok(()) => tracing::info!(chat_id = chat_id.0, post_id = %post_ref.post_id, "post sent"),
        Err(e) => tracing::error!(
            chat_id = chat_id.0,
            handle = %post_ref.handle,
            post_id = %post_ref.post_id,
            error = %e,
            "send post failed"
        ),
    }
    Ok(())
}
