/// Core error type for the relay bot.
///
/// Adapter crates map their specific errors into this type so handlers can decide
/// between a user-facing reply and a log line.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("fetch post: {0}")]
    Fetch(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("publish article: {0}")]
    Publish(String),

    #[error("request timed out")]
    Timeout,

    #[error("request cancelled")]
    Cancelled,

    #[error("external error: {0}")]
    External(String),
}

impl Error {
    /// True for failures caused by the request context rather than the remote side.
    pub fn is_deadline(&self) -> bool {
        matches!(self, Error::Timeout | Error::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
