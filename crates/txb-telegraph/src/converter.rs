//! Plain text → Telegraph nodes.

use std::sync::OnceLock;

use regex::Regex;

use crate::{errors::TelegraphError, models::Node};

pub const MAX_CONTENT_LENGTH: usize = 64 * 1024;
pub const MAX_TITLE_LENGTH: usize = 256;

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://\S+").expect("valid regex"))
}

pub fn validate_title(title: &str) -> Result<String, TelegraphError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TelegraphError::TitleEmpty);
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(TelegraphError::TitleTooLong);
    }
    Ok(trimmed.to_string())
}

/// One `p` per blank-line separated paragraph, `br` between lines, bare URLs as links.
pub fn text_to_nodes(text: &str) -> Result<Vec<Node>, TelegraphError> {
    if text.trim().is_empty() {
        return Err(TelegraphError::ContentEmpty);
    }
    if text.len() > MAX_CONTENT_LENGTH {
        return Err(TelegraphError::ContentTooLong);
    }

    let nodes: Vec<Node> = text
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| Node::element("p", paragraph(p)))
        .collect();

    if nodes.is_empty() {
        return Err(TelegraphError::ContentEmpty);
    }
    Ok(nodes)
}

fn paragraph(text: &str) -> Vec<Node> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let line = line.trim();
        if !line.is_empty() {
            out.extend(inline_nodes(line));
        }
        if i + 1 < lines.len() {
            out.push(Node::line_break());
        }
    }
    out
}

fn inline_nodes(line: &str) -> Vec<Node> {
    let mut out = Vec::new();
    let mut last = 0;
    for m in url_re().find_iter(line) {
        if m.start() > last {
            out.push(Node::text(&line[last..m.start()]));
        }
        out.push(Node::link(m.as_str()));
        last = m.end();
    }
    if last < line.len() {
        out.push(Node::text(&line[last..]));
    }
    out
}
