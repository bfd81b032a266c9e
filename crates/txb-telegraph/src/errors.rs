#[derive(Debug, thiserror::Error)]
pub enum TelegraphError {
    #[error("telegraph api error: {0}")]
    Api(String),

    #[error("content exceeds 64KB limit")]
    ContentTooLong,

    #[error("content is empty")]
    ContentEmpty,

    #[error("title exceeds 256 characters")]
    TitleTooLong,

    #[error("title is empty")]
    TitleEmpty,

    #[error("account has no access token")]
    NoAccessToken,

    #[error("telegraph request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("telegraph json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<TelegraphError> for txb_core::Error {
    fn from(e: TelegraphError) -> Self {
        txb_core::Error::Publish(e.to_string())
    }
}
