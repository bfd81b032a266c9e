use async_trait::async_trait;

use crate::{context::RequestContext, post::Post, Result};

/// Upstream post lookup.
///
/// Any error (including "no data") means the post cannot be resolved. Chain walks
/// treat it as the end of the chain; the leaf fetch treats it as fatal.
#[async_trait]
pub trait PostFetcher: Send + Sync {
    async fn get_post(&self, ctx: &RequestContext, handle: &str, post_id: &str) -> Result<Post>;
}

/// Long-form article host used when a caption overflows.
#[async_trait]
pub trait ArticlePublisher: Send + Sync {
    /// Publishes `text` under `title` and returns the article URL.
    async fn create_article(&self, ctx: &RequestContext, text: &str, title: &str)
        -> Result<String>;
}
