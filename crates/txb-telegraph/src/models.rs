use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// `{ok, result, error}` wrapper of every Telegraph API response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub ok: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Account {
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_url: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub auth_url: String,
    #[serde(default)]
    pub page_count: u32,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Page {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub views: u32,
    #[serde(default)]
    pub can_edit: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateAccountRequest {
    pub short_name: String,
    pub author_name: String,
    pub author_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatePageRequest {
    pub access_token: String,
    pub title: String,
    pub content: Vec<Node>,
    pub author_name: String,
    pub author_url: String,
    pub return_content: bool,
}

/// Telegraph DOM node: a bare string or an element.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Node {
    Text(String),
    Element(Element),
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attrs: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn text(s: impl Into<String>) -> Self {
        Node::Text(s.into())
    }

    pub fn element(tag: &str, children: Vec<Node>) -> Self {
        Node::Element(Element {
            tag: tag.to_string(),
            attrs: None,
            children,
        })
    }

    pub fn line_break() -> Self {
        Node::element("br", Vec::new())
    }

    pub fn link(href: &str) -> Self {
        Node::Element(Element {
            tag: "a".to_string(),
            attrs: Some(BTreeMap::from([("href".to_string(), href.to_string())])),
            children: vec![Node::text(href)],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_serialize_to_telegraph_dom() {
        let nodes = vec![Node::element(
            "p",
            vec![
                Node::text("see "),
                Node::link("https://x.com"),
                Node::line_break(),
            ],
        )];
        let json = serde_json::to_string(&nodes).unwrap();
        assert_eq!(
            json,
            r#"[{"tag":"p","children":["see ",{"tag":"a","attrs":{"href":"https://x.com"},"children":["https://x.com"]},{"tag":"br"}]}]"#
        );
    }

    #[test]
    fn envelope_tolerates_missing_fields() {
        let ok: ApiResponse<Page> =
            serde_json::from_str(r#"{"ok":true,"result":{"url":"https://telegra.ph/a"}}"#).unwrap();
        assert!(ok.ok);
        assert_eq!(ok.result.unwrap().url, "https://telegra.ph/a");

        let err: ApiResponse<Page> =
            serde_json::from_str(r#"{"ok":false,"error":"ACCESS_TOKEN_INVALID"}"#).unwrap();
        assert!(!err.ok);
        assert!(err.result.is_none());
        assert_eq!(err.error.as_deref(), Some("ACCESS_TOKEN_INVALID"));
    }
}
