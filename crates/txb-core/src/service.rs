//! Use cases behind the bot handlers.

use std::sync::Arc;

use crate::{
    callback::{build_keyboard, chain_only_keyboard, ChainToken, DeleteToken, KeyboardOptions},
    chain::build_chain,
    context::RequestContext,
    delivery::{SendOptions, Sender},
    domain::{ChatId, MessageId, MessageRef},
    errors::Error,
    inline::{build_inline_result, InlineResult},
    ports::PostFetcher,
    post::{Post, PostRef},
    Result,
};

pub struct PostService {
    fetcher: Arc<dyn PostFetcher>,
    sender: Sender,
}

impl PostService {
    pub fn new(fetcher: Arc<dyn PostFetcher>, sender: Sender) -> Self {
        Self { fetcher, sender }
    }

    pub fn sender(&self) -> &Sender {
        &self.sender
    }

    /// Fetches the post the user referenced. Unlike chain ancestors, failure here is fatal.
    async fn fetch_leaf(&self, ctx: &RequestContext, post: &PostRef) -> Result<Post> {
        ctx.run(self.fetcher.get_post(ctx, &post.handle, &post.post_id))
            .await
            .map_err(|e| match e {
                e @ (Error::Timeout | Error::Cancelled | Error::Fetch(_)) => e,
                other => Error::Fetch(other.to_string()),
            })
    }

    /// Replies to `origin` with the post, offering the chain button when it is a reply.
    pub async fn send_post(
        &self,
        ctx: &RequestContext,
        chat_id: ChatId,
        origin: MessageId,
        post_ref: &PostRef,
        requester: Option<&str>,
    ) -> Result<()> {
        let post = self.fetch_leaf(ctx, post_ref).await?;

        let kb_opts = post
            .is_reply()
            .then(|| KeyboardOptions::with_chain(post_ref.clone()));
        let opts = SendOptions {
            reply_to: Some(origin),
            keyboard: Some(build_keyboard(i64::from(origin.0), kb_opts.as_ref())),
            requester: requester.map(str::to_string),
        };

        self.sender
            .render_and_send(ctx, chat_id, &post, opts)
            .await?;
        Ok(())
    }

    pub async fn send_chain(
        &self,
        ctx: &RequestContext,
        chat_id: ChatId,
        origin: Option<MessageId>,
        post_ref: &PostRef,
        requester: Option<&str>,
    ) -> Result<()> {
        let leaf = self.fetch_leaf(ctx, post_ref).await?;
        let entries = build_chain(ctx, self.fetcher.as_ref(), Some(&leaf)).await;
        tracing::info!(
            chat_id = chat_id.0,
            handle = %post_ref.handle,
            post_id = %post_ref.post_id,
            entries = entries.len(),
            "sending chain"
        );
        self.sender
            .send_chain(ctx, chat_id, &entries, origin, requester)
            .await
    }

    /// "Send full chain" button: post the chain, then drop the message that carried the button.
    pub async fn expand_chain(
        &self,
        ctx: &RequestContext,
        button_message: MessageRef,
        token: &ChainToken,
        requester: Option<&str>,
    ) -> Result<()> {
        let origin = message_id(token.origin_message_id);
        let post_ref = PostRef::new(&token.handle, &token.post_id);
        self.send_chain(ctx, button_message.chat_id, origin, &post_ref, requester)
            .await?;

        if let Err(e) = self.sender.transport().delete_message(button_message).await {
            tracing::debug!(
                chat_id = button_message.chat_id.0,
                message_id = button_message.message_id.0,
                error = %e,
                "delete button message failed"
            );
        }
        Ok(())
    }

    pub async fn inline_result(
        &self,
        ctx: &RequestContext,
        post_ref: &PostRef,
        fallback_id: &str,
    ) -> Result<Option<InlineResult>> {
        let post = self.fetch_leaf(ctx, post_ref).await?;
        Ok(build_inline_result(self.sender.formatter(), &post, fallback_id))
    }

    /// "Delete original" button.
    ///
    /// Deleting the user's message must succeed; rewriting the bot message keyboard is
    /// best-effort. With chain info the chain button is re-offered, otherwise the
    /// keyboard is removed.
    pub async fn delete_original(&self, bot_message: MessageRef, token: &DeleteToken) -> Result<()> {
        let origin = message_id(token.origin_message_id).ok_or_else(|| {
            Error::Transport(format!(
                "origin message id {} out of range",
                token.origin_message_id
            ))
        })?;
        let transport = self.sender.transport();

        transport
            .delete_message(MessageRef {
                chat_id: bot_message.chat_id,
                message_id: origin,
            })
            .await?;

        let keyboard = token.chain_token().map(|t| chain_only_keyboard(&t));
        if let Err(e) = transport.edit_keyboard(bot_message, keyboard).await {
            tracing::debug!(
                chat_id = bot_message.chat_id.0,
                message_id = bot_message.message_id.0,
                error = %e,
                "edit reply markup failed"
            );
        }
        Ok(())
    }

    /// Typing indicator while a post is being fetched. Failures are only logged.
    pub async fn notify_typing(&self, chat_id: ChatId) {
        if let Err(e) = self.sender.transport().send_typing(chat_id).await {
            tracing::debug!(chat_id = chat_id.0, error = %e, "send typing failed");
        }
    }
}

/// Token message ids are i64; zero means "no origin".
fn message_id(raw: i64) -> Option<MessageId> {
    match i32::try_from(raw) {
        Ok(0) | Err(_) => None,
        Ok(id) => Some(MessageId(id)),
    }
}
