use std::sync::Arc;

use teloxide::{prelude::*, types::InlineQueryResult};

use txb_core::{context::RequestContext, url_parser::parse_post_url};

use crate::convert::inline_query_result;
use crate::router::AppState;

async fn answer(bot: &Bot, q: &InlineQuery, results: Vec<InlineQueryResult>) -> ResponseResult<()> {
    bot.answer_inline_query(q.id.clone(), results)
        .cache_time(0)
        .is_personal(true)
        .await?;
    Ok(())
}

pub async fn handle_inline_query(
    bot: Bot,
    q: InlineQuery,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    let query = q.query.trim();
    tracing::debug!(query, "inline query received");

    let Some(post_ref) = parse_post_url(query) else {
        return answer(&bot, &q, Vec::new()).await;
    };
    tracing::info!(handle = %post_ref.handle, post_id = %post_ref.post_id, "inline post url parsed");

    let ctx = RequestContext::with_timeout(state.cfg.inline_timeout);
    let result = match state.service.inline_result(&ctx, &post_ref, &q.id).await {
        Ok(Some(r)) => r,
        Ok(None) => {
            tracing::error!(post_id = %post_ref.post_id, "no suitable inline result");
            return answer(&bot, &q, Vec::new()).await;
        }
        Err(e) => {
            tracing::error!(handle = %post_ref.handle, post_id = %post_ref.post_id, error = %e, "fetch post for inline query failed");
            return answer(&bot, &q, Vec::new()).await;
        }
    };

    let results = match inline_query_result(result) {
        Ok(r) => vec![r],
        Err(e) => {
            tracing::error!(post_id = %post_ref.post_id, error = %e, "build inline result failed");
            Vec::new()
        }
    };
    answer(&bot, &q, results).await
}
