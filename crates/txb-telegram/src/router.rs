use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use txb_core::{
    config::Config,
    delivery::Sender,
    formatting::Formatter,
    ports::{ArticlePublisher, PostFetcher},
    service::PostService,
};

use crate::handlers;
use crate::TelegramTransport;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub service: Arc<PostService>,
}

pub fn build_bot(cfg: &Config) -> anyhow::Result<Bot> {
    let bot = Bot::new(cfg.bot_token.clone());
    match cfg.telegram_api_url.as_deref() {
        Some(url) => {
            let url = reqwest::Url::parse(url)
                .map_err(|e| anyhow::anyhow!("invalid TELEGRAM_API_URL {url:?}: {e}"))?;
            tracing::info!(%url, "using custom telegram api url");
            Ok(bot.set_api_url(url))
        }
        None => Ok(bot),
    }
}

pub async fn run_polling(
    cfg: Arc<Config>,
    fetcher: Arc<dyn PostFetcher>,
    publisher: Option<Arc<dyn ArticlePublisher>>,
) -> anyhow::Result<()> {
    let bot = build_bot(&cfg)?;

    match bot.get_me().await {
        Ok(me) => tracing::info!(username = %me.username(), "bot started"),
        Err(e) => return Err(anyhow::anyhow!("telegram getMe failed: {e}")),
    }

    let transport = Arc::new(TelegramTransport::new(bot.clone()));
    let mut sender = Sender::new(transport, Formatter::telegram());
    if let Some(publisher) = publisher {
        sender = sender.with_publisher(publisher);
    }

    let state = Arc::new(AppState {
        cfg,
        service: Arc::new(PostService::new(fetcher, sender)),
    });

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_inline_query().endpoint(handlers::handle_inline_query))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}
