//! TwitterX API adapter (post lookup).
//!
//! `GET {base}/api/users/{handle}/tweets/{id}` returning `{code, message, tweet}`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use txb_core::{context::RequestContext, errors::Error, ports::PostFetcher, post::Post, Result};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(12);

#[derive(Debug, Deserialize)]
struct PostResponse {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
    #[serde(default)]
    tweet: Option<Post>,
}

#[derive(Clone, Debug)]
pub struct XApiClient {
    base_url: reqwest::Url,
    http: reqwest::Client,
}

impl XApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = match base_url.trim().trim_end_matches('/') {
            "" => DEFAULT_BASE_URL,
            b => b,
        };
        let base_url = reqwest::Url::parse(base)
            .map_err(|e| Error::Config(format!("invalid TWITTERX_API_URL {base:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!("TWITTERX_API_URL {base:?} cannot be a base URL")));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("reqwest client build: {e}")))?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Request URL with `handle` and `post_id` escaped as single path segments.
    pub fn post_url(&self, handle: &str, post_id: &str) -> Result<reqwest::Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config("TWITTERX_API_URL cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend(["api", "users", handle, "tweets", post_id]);
        Ok(url)
    }

    async fn fetch(&self, handle: &str, post_id: &str) -> Result<Post> {
        if handle.is_empty() {
            return Err(Error::Fetch("handle is required".to_string()));
        }
        if post_id.is_empty() {
            return Err(Error::Fetch("post id is required".to_string()));
        }

        let url = self.post_url(handle, post_id)?;
        tracing::debug!(%url, "fetching post");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("request error: {e}")))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::Fetch(format!("read response: {e}")))?;

        parse_response(status, &body)
    }
}

/// Validates the HTTP status and envelope, returning the embedded post.
pub fn parse_response(status: u16, body: &str) -> Result<Post> {
    if status != 200 {
        return Err(Error::Fetch(format!(
            "api status {status}: {}",
            body.trim().chars().take(200).collect::<String>()
        )));
    }

    let envelope: PostResponse = serde_json::from_str(body)
        .map_err(|e| Error::Fetch(format!("decode response: {e}")))?;
    if envelope.code != 200 {
        return Err(Error::Fetch(format!(
            "api error {}: {}",
            envelope.code, envelope.message
        )));
    }
    envelope
        .tweet
        .ok_or_else(|| Error::Fetch("api response missing tweet".to_string()))
}

#[async_trait]
impl PostFetcher for XApiClient {
    async fn get_post(&self, ctx: &RequestContext, handle: &str, post_id: &str) -> Result<Post> {
        ctx.run(self.fetch(handle, post_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> XApiClient {
        XApiClient::new(base, DEFAULT_TIMEOUT).unwrap()
    }

    #[test]
    fn builds_escaped_request_urls() {
        let c = client("http://api.local:8080/");
        assert_eq!(
            c.post_url("alice", "123").unwrap().as_str(),
            "http://api.local:8080/api/users/alice/tweets/123"
        );
        assert_eq!(
            c.post_url("a/b c", "1?x").unwrap().as_str(),
            "http://api.local:8080/api/users/a%2Fb%20c/tweets/1%3Fx"
        );

        let prefixed = client("https://host/twx");
        assert_eq!(
            prefixed.post_url("bob", "9").unwrap().as_str(),
            "https://host/twx/api/users/bob/tweets/9"
        );
    }

    #[test]
    fn empty_base_uses_default() {
        assert_eq!(client("").base_url(), "http://127.0.0.1:8080/");
        assert!(XApiClient::new("not a url", DEFAULT_TIMEOUT).is_err());
    }

    #[test]
    fn parses_successful_envelope() {
        let body = r#"{
            "code": 200,
            "message": "OK",
            "tweet": {
                "id": "123",
                "url": "https://x.com/alice/status/123",
                "text": "hi",
                "author": {"name": "Alice", "screen_name": "alice", "avatar_url": ""},
                "replying_to": "bob",
                "replying_to_status": "100"
            }
        }"#;
        let post = parse_response(200, body).unwrap();
        assert_eq!(post.id, "123");
        assert_eq!(post.ancestor().unwrap().handle, "bob");
    }

    #[test]
    fn rejects_bad_status_and_envelopes() {
        assert!(matches!(parse_response(404, "not found"), Err(Error::Fetch(m)) if m.contains("404")));
        assert!(matches!(parse_response(200, "{"), Err(Error::Fetch(m)) if m.contains("decode")));
        assert!(matches!(
            parse_response(200, r#"{"code": 404, "message": "Tweet not found"}"#),
            Err(Error::Fetch(m)) if m.contains("Tweet not found")
        ));
        assert!(matches!(
            parse_response(200, r#"{"code": 200, "message": "OK"}"#),
            Err(Error::Fetch(m)) if m.contains("missing tweet")
        ));
    }

    #[tokio::test]
    async fn rejects_empty_identifiers_before_request() {
        let c = client("http://127.0.0.1:1");
        let ctx = RequestContext::new();
        assert!(matches!(c.get_post(&ctx, "", "1").await, Err(Error::Fetch(_))));
        assert!(matches!(c.get_post(&ctx, "alice", "").await, Err(Error::Fetch(_))));
    }
}
