use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::{
    errors::TelegraphError,
    models::{Account, ApiResponse, CreateAccountRequest, CreatePageRequest, Page},
};

pub const DEFAULT_BASE_URL: &str = "https://api.telegra.ph";

/// Telegraph API surface used by the service.
#[async_trait]
pub trait TelegraphApi: Send + Sync {
    async fn create_account(&self, req: &CreateAccountRequest) -> Result<Account, TelegraphError>;
    async fn create_page(&self, req: &CreatePageRequest) -> Result<Page, TelegraphError>;
}

#[derive(Clone, Debug)]
pub struct HttpTelegraphClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTelegraphClient {
    pub fn new(timeout: Duration) -> Result<Self, TelegraphError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        self.base_url = match base.trim().trim_end_matches('/') {
            "" => DEFAULT_BASE_URL.to_string(),
            b => b.to_string(),
        };
        self
    }

    async fn post<T: DeserializeOwned>(
        &self,
        method: &str,
        form: &[(&str, String)],
    ) -> Result<T, TelegraphError> {
        let url = format!("{}/{method}", self.base_url);
        let body = self
            .http
            .post(url)
            .form(form)
            .send()
            .await?
            .text()
            .await?;
        parse_envelope(&body)
    }
}

/// Unwraps `{ok, result, error}`; `ok: false` becomes [`TelegraphError::Api`].
pub fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<T, TelegraphError> {
    let resp: ApiResponse<T> = serde_json::from_str(body)?;
    if !resp.ok {
        return Err(TelegraphError::Api(
            resp.error.unwrap_or_else(|| "unknown error".to_string()),
        ));
    }
    resp.result
        .ok_or_else(|| TelegraphError::Api("response has no result".to_string()))
}

fn push_optional(form: &mut Vec<(&'static str, String)>, key: &'static str, value: &str) {
    if !value.is_empty() {
        form.push((key, value.to_string()));
    }
}

pub fn account_form(req: &CreateAccountRequest) -> Vec<(&'static str, String)> {
    let mut form = vec![("short_name", req.short_name.clone())];
    push_optional(&mut form, "author_name", &req.author_name);
    push_optional(&mut form, "author_url", &req.author_url);
    form
}

pub fn page_form(req: &CreatePageRequest) -> Result<Vec<(&'static str, String)>, TelegraphError> {
    let mut form = vec![
        ("access_token", req.access_token.clone()),
        ("title", req.title.clone()),
        ("content", serde_json::to_string(&req.content)?),
    ];
    push_optional(&mut form, "author_name", &req.author_name);
    push_optional(&mut form, "author_url", &req.author_url);
    form.push(("return_content", req.return_content.to_string()));
    Ok(form)
}

#[async_trait]
impl TelegraphApi for HttpTelegraphClient {
    async fn create_account(&self, req: &CreateAccountRequest) -> Result<Account, TelegraphError> {
        self.post("createAccount", &account_form(req)).await
    }

    async fn create_page(&self, req: &CreatePageRequest) -> Result<Page, TelegraphError> {
        let form = page_form(req)?;
        self.post("createPage", &form).await
    }
}
