use std::sync::Arc;

use txb_core::{
    config::Config,
    ports::{ArticlePublisher, PostFetcher},
};
use txb_telegraph::{HttpTelegraphClient, TelegraphService};
use txb_xapi::XApiClient;

#[tokio::main]
async fn main() -> Result<(), txb_core::Error> {
    let cfg = Arc::new(Config::load()?);
    txb_core::logging::init("txb", cfg.debug)?;

    let fetcher: Arc<dyn PostFetcher> = Arc::new(XApiClient::new(
        &cfg.twitterx_api_url,
        cfg.upstream_http_timeout,
    )?);
    tracing::info!(api_url = %cfg.twitterx_api_url, "upstream api configured");

    let publisher: Option<Arc<dyn ArticlePublisher>> = if cfg.telegraph_enabled {
        let client = HttpTelegraphClient::new(cfg.telegraph_http_timeout)?;
        let service = TelegraphService::new(Arc::new(client))
            .with_author_name(cfg.telegraph_author_name.clone())
            .with_author_url(cfg.telegraph_author_url.clone());
        Some(Arc::new(service))
    } else {
        tracing::info!("telegraph publishing disabled");
        None
    };

    txb_telegram::router::run_polling(cfg, fetcher, publisher)
        .await
        .map_err(|e| txb_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
