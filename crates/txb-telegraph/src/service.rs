use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use txb_core::{context::RequestContext, ports::ArticlePublisher, Result};

use crate::{
    client::TelegraphApi,
    converter::{text_to_nodes, validate_title},
    errors::TelegraphError,
    models::{Account, CreateAccountRequest, CreatePageRequest},
};

pub const DEFAULT_AUTHOR_NAME: &str = "TwitterX Bot";

/// Publishes articles under a lazily created Telegraph account.
pub struct TelegraphService {
    api: Arc<dyn TelegraphApi>,
    short_name: String,
    author_name: String,
    author_url: String,
    account: Mutex<Option<Account>>,
}

impl TelegraphService {
    pub fn new(api: Arc<dyn TelegraphApi>) -> Self {
        let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        Self {
            api,
            short_name: format!("TwitterX-{}", nanos.rem_euclid(100_000)),
            author_name: DEFAULT_AUTHOR_NAME.to_string(),
            author_url: String::new(),
            account: Mutex::new(None),
        }
    }

    pub fn with_short_name(mut self, name: impl Into<String>) -> Self {
        self.short_name = name.into();
        self
    }

    pub fn with_author_name(mut self, name: impl Into<String>) -> Self {
        self.author_name = name.into();
        self
    }

    pub fn with_author_url(mut self, url: impl Into<String>) -> Self {
        self.author_url = url.into();
        self
    }

    pub async fn publish(&self, text: &str, title: &str) -> std::result::Result<String, TelegraphError> {
        let title = validate_title(title)?;
        let content = text_to_nodes(text)?;
        let access_token = self.access_token().await?;

        let page = self
            .api
            .create_page(&CreatePageRequest {
                access_token,
                title,
                content,
                author_name: self.author_name.clone(),
                author_url: self.author_url.clone(),
                return_content: false,
            })
            .await?;

        tracing::info!(url = %page.url, "telegraph article created");
        Ok(page.url)
    }

    /// Cached token, creating the account on first use. The lock is held across
    /// creation so concurrent first calls create one account.
    async fn access_token(&self) -> std::result::Result<String, TelegraphError> {
        let mut slot = self.account.lock().await;
        if let Some(account) = slot.as_ref() {
            return Ok(account.access_token.clone());
        }

        let account = self
            .api
            .create_account(&CreateAccountRequest {
                short_name: self.short_name.clone(),
                author_name: self.author_name.clone(),
                author_url: self.author_url.clone(),
            })
            .await?;
        if account.access_token.is_empty() {
            return Err(TelegraphError::NoAccessToken);
        }

        tracing::info!(short_name = %account.short_name, "telegraph account created");
        let token = account.access_token.clone();
        *slot = Some(account);
        Ok(token)
    }
}

#[async_trait]
impl ArticlePublisher for TelegraphService {
    async fn create_article(&self, ctx: &RequestContext, text: &str, title: &str) -> Result<String> {
        ctx.run(async { self.publish(text, title).await.map_err(Into::into) })
            .await
    }
}
