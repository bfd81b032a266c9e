//! Post → Telegram text (plain and HTML), with per-surface length limits.

use crate::post::Post;

/// Telegram limits: https://core.telegram.org/bots/api#sending-messages
pub const MAX_CAPTION_LENGTH: usize = 1024;
pub const MAX_MESSAGE_LENGTH: usize = 4096;
pub const MAX_DESCRIPTION_LENGTH: usize = 140;

const ELLIPSIS: &str = "...";

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Text builders with configurable limits. A zero limit means "use the Telegram default".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Formatter {
    pub max_caption_len: usize,
    pub max_message_len: usize,
    pub max_description_len: usize,
}

impl Formatter {
    pub fn telegram() -> Self {
        Self {
            max_caption_len: MAX_CAPTION_LENGTH,
            max_message_len: MAX_MESSAGE_LENGTH,
            max_description_len: MAX_DESCRIPTION_LENGTH,
        }
    }

    pub fn with_defaults(self) -> Self {
        let or = |v: usize, d: usize| if v == 0 { d } else { v };
        Self {
            max_caption_len: or(self.max_caption_len, MAX_CAPTION_LENGTH),
            max_message_len: or(self.max_message_len, MAX_MESSAGE_LENGTH),
            max_description_len: or(self.max_description_len, MAX_DESCRIPTION_LENGTH),
        }
    }

    pub fn caption_limit(&self) -> usize {
        self.with_defaults().max_caption_len
    }

    pub fn title(&self, post: &Post) -> String {
        let handle = post.author.screen_name.trim();
        if !handle.is_empty() {
            if handle.starts_with('@') {
                return format!("Tweet by {handle}");
            }
            return format!("Tweet by @{handle}");
        }
        let name = post.author.name.trim();
        if !name.is_empty() {
            return format!("Tweet by {name}");
        }
        "Tweet".to_string()
    }

    /// `text`, `url`, or `text + "\n\n" + url`, both trimmed.
    pub fn plain_content(&self, post: &Post) -> String {
        let text = post.text.trim();
        let url = post.url.trim();
        if text.is_empty() {
            return url.to_string();
        }
        if url.is_empty() {
            return text.to_string();
        }
        format!("{text}\n\n{url}")
    }

    pub fn caption(&self, post: &Post) -> String {
        truncate_text(&self.plain_content(post), self.with_defaults().max_caption_len)
    }

    pub fn message_text(&self, post: &Post) -> String {
        truncate_text(&self.plain_content(post), self.with_defaults().max_message_len)
    }

    pub fn description(&self, post: &Post) -> String {
        truncate_text(post.text.trim(), self.with_defaults().max_description_len)
    }

    /// `<a href="URL">Tweet</a> from <a href="PROFILE">Name</a>` followed by the escaped
    /// text and, when given, the requester line.
    ///
    /// Header parts drop silently when their source field is empty.
    pub fn html_content(&self, post: &Post, requester: Option<&str>) -> String {
        let url = post.url.trim();
        let screen_name = post.author.screen_name.trim();
        let display_name = match post.author.name.trim() {
            "" => screen_name,
            name => name,
        };

        let mut out = String::new();
        if url.is_empty() {
            out.push_str("Tweet");
        } else {
            out.push_str(&format!(r#"<a href="{}">Tweet</a>"#, escape_html(url)));
        }

        if !display_name.is_empty() {
            match profile_url(screen_name) {
                Some(profile) => out.push_str(&format!(
                    r#" from <a href="{}">{}</a>"#,
                    escape_html(&profile),
                    escape_html(display_name)
                )),
                None => out.push_str(&format!(" from {}", escape_html(display_name))),
            }
        }

        let text = post.text.trim();
        if !text.is_empty() {
            out.push_str("\n\n");
            out.push_str(&escape_html(text));
        }

        if let Some(name) = requester.map(str::trim).filter(|n| !n.is_empty()) {
            out.push_str("\n\nRequested by ");
            out.push_str(&escape_html(name));
        }

        out
    }

    pub fn html_caption(&self, post: &Post, requester: Option<&str>) -> String {
        truncate_html(
            &self.html_content(post, requester),
            self.with_defaults().max_caption_len,
        )
    }

    pub fn html_message_text(&self, post: &Post, requester: Option<&str>) -> String {
        truncate_html(
            &self.html_content(post, requester),
            self.with_defaults().max_message_len,
        )
    }
}

fn profile_url(screen_name: &str) -> Option<String> {
    let name = screen_name.trim_start_matches('@');
    if name.is_empty() {
        return None;
    }
    Some(format!("https://x.com/{name}"))
}

/// Truncate to `max` code points, ending in `...` when cut (hard cut for `max <= 3`).
pub fn truncate_text(input: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if input.chars().count() <= max {
        return input.to_string();
    }
    if max <= 3 {
        return input.chars().take(max).collect();
    }
    let mut out: String = input.chars().take(max - ELLIPSIS.len()).collect();
    out.push_str(ELLIPSIS);
    out
}

enum Token<'a> {
    /// Complete `<...>` markup.
    Tag(&'a str),
    /// One visible character (a character reference counts as one).
    Visible(&'a str),
    /// `<` without a closing `>`.
    Dangling,
}

fn next_token(s: &str) -> Option<Token<'_>> {
    let c = s.chars().next()?;
    match c {
        '<' => Some(match s.find('>') {
            Some(end) => Token::Tag(&s[..=end]),
            None => Token::Dangling,
        }),
        '&' => Some(Token::Visible(&s[..entity_len(s).unwrap_or(1)])),
        _ => Some(Token::Visible(&s[..c.len_utf8()])),
    }
}

/// Byte length of a character reference (`&amp;`, `&#39;`) at the start of `s`.
fn entity_len(s: &str) -> Option<usize> {
    let (idx, c) = s
        .char_indices()
        .skip(1)
        .take(12)
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '#'))?;
    (c == ';' && idx > 1).then_some(idx + 1)
}

/// Number of visible characters in Telegram HTML (markup excluded).
pub fn visible_len(html: &str) -> usize {
    let mut count = 0;
    let mut rest = html;
    while let Some(tok) = next_token(rest) {
        match tok {
            Token::Tag(t) => rest = &rest[t.len()..],
            Token::Visible(v) => {
                count += 1;
                rest = &rest[v.len()..];
            }
            Token::Dangling => break,
        }
    }
    count
}

/// Truncate HTML to `max` visible characters, keeping the output well-formed.
///
/// Markup is copied verbatim and not counted. Tags still open at the cut point are
/// closed in reverse order after the ellipsis; stray closing tags are dropped.
pub fn truncate_html(input: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if visible_len(input) <= max {
        return input.to_string();
    }

    let (budget, ellipsis) = if max <= 3 {
        (max, "")
    } else {
        (max - ELLIPSIS.len(), ELLIPSIS)
    };

    let mut out = String::with_capacity(input.len());
    let mut open: Vec<&str> = Vec::new();
    let mut visible = 0usize;
    let mut rest = input;

    while let Some(tok) = next_token(rest) {
        match tok {
            Token::Tag(tag) => {
                push_tag(&mut out, &mut open, tag);
                rest = &rest[tag.len()..];
            }
            Token::Visible(v) => {
                if visible >= budget {
                    out.push_str(ellipsis);
                    break;
                }
                out.push_str(v);
                visible += 1;
                rest = &rest[v.len()..];
            }
            Token::Dangling => break,
        }
    }

    for name in open.iter().rev() {
        out.push_str("</");
        out.push_str(name);
        out.push('>');
    }
    out
}

fn tag_name(inner: &str) -> &str {
    inner
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or("")
}

fn push_tag<'a>(out: &mut String, open: &mut Vec<&'a str>, tag: &'a str) {
    let inner = &tag[1..tag.len() - 1];

    if let Some(closing) = inner.strip_prefix('/') {
        let name = tag_name(closing.trim_start());
        let Some(pos) = open.iter().rposition(|t| t.eq_ignore_ascii_case(name)) else {
            return;
        };
        // Close anything opened after the matching tag so nesting stays valid.
        while open.len() > pos + 1 {
            if let Some(inner_name) = open.pop() {
                out.push_str("</");
                out.push_str(inner_name);
                out.push('>');
            }
        }
        open.pop();
        out.push_str(tag);
        return;
    }

    out.push_str(tag);
    if inner.ends_with('/') || inner.starts_with('!') || inner.starts_with('?') {
        return;
    }
    let name = tag_name(inner);
    if !name.is_empty() {
        open.push(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::Author;

    fn post(text: &str, url: &str, name: &str, screen_name: &str) -> Post {
        Post {
            text: text.to_string(),
            url: url.to_string(),
            author: Author {
                name: name.to_string(),
                screen_name: screen_name.to_string(),
                avatar_url: String::new(),
            },
            ..Default::default()
        }
    }

    /// Every opening tag is closed in LIFO order.
    fn is_balanced(html: &str) -> bool {
        let mut stack: Vec<String> = Vec::new();
        let mut rest = html;
        while let Some(start) = rest.find('<') {
            let Some(end) = rest[start..].find('>') else {
                return false;
            };
            let inner = &rest[start + 1..start + end];
            if let Some(name) = inner.strip_prefix('/') {
                if stack.pop().as_deref() != Some(tag_name(name)) {
                    return false;
                }
            } else if !inner.ends_with('/') {
                stack.push(tag_name(inner).to_string());
            }
            rest = &rest[start + end + 1..];
        }
        stack.is_empty()
    }

    #[test]
    fn escapes_html() {
        let s = r#"<a href="x&y">'"#;
        assert_eq!(escape_html(s), "&lt;a href=&quot;x&amp;y&quot;&gt;&#39;");
    }

    #[test]
    fn title_prefers_handle() {
        let f = Formatter::telegram();
        assert_eq!(f.title(&post("", "", "Alice", "alice")), "Tweet by @alice");
        assert_eq!(f.title(&post("", "", "Alice", "@alice")), "Tweet by @alice");
        assert_eq!(f.title(&post("", "", "Alice", "")), "Tweet by Alice");
        assert_eq!(f.title(&Post::default()), "Tweet");
    }

    #[test]
    fn plain_content_joins_trimmed_parts() {
        let f = Formatter::default();
        assert_eq!(f.plain_content(&Post::default()), "");
        assert_eq!(f.plain_content(&post("  hello  ", "", "", "")), "hello");
        assert_eq!(
            f.plain_content(&post("", "  https://x.com/1  ", "", "")),
            "https://x.com/1"
        );
        assert_eq!(
            f.plain_content(&post(" hello ", " https://x.com/2 ", "", "")),
            "hello\n\nhttps://x.com/2"
        );
        assert_eq!(
            f.plain_content(&post("   ", "https://x.com/3", "", "")),
            "https://x.com/3"
        );
    }

    #[test]
    fn caption_and_message_text_use_defaults() {
        let f = Formatter::default();
        let p = post("hello", "https://x.com/1", "", "");
        assert_eq!(f.caption(&p), "hello\n\nhttps://x.com/1");
        assert_eq!(f.message_text(&p), "hello\n\nhttps://x.com/1");

        let long = post(&"a".repeat(200), "", "", "");
        assert_eq!(f.description(&long).chars().count(), MAX_DESCRIPTION_LENGTH);
    }

    #[test]
    fn html_content_full_header() {
        let f = Formatter::telegram();
        let p = post(
            "a < b & c",
            "https://x.com/alice/status/1",
            "Alice",
            "alice",
        );
        assert_eq!(
            f.html_content(&p, None),
            "<a href=\"https://x.com/alice/status/1\">Tweet</a> from <a href=\"https://x.com/alice\">Alice</a>\n\na &lt; b &amp; c"
        );
    }

    #[test]
    fn html_content_degrades_gracefully() {
        let f = Formatter::telegram();
        assert_eq!(f.html_content(&Post::default(), None), "Tweet");
        assert_eq!(
            f.html_content(&post("", "", "Alice", ""), None),
            "Tweet from Alice"
        );
        assert_eq!(
            f.html_content(&post("hi", "", "", "bob"), None),
            "Tweet from <a href=\"https://x.com/bob\">bob</a>\n\nhi"
        );
    }

    #[test]
    fn html_content_appends_requester() {
        let f = Formatter::telegram();
        let html = f.html_content(&post("hi", "", "", ""), Some("Eve <3"));
        assert_eq!(html, "Tweet\n\nhi\n\nRequested by Eve &lt;3");
        assert_eq!(f.html_content(&post("hi", "", "", ""), Some("  ")), "Tweet\n\nhi");
    }

    #[test]
    fn truncate_text_cases() {
        let wide = "\u{4e16}\u{754c}\u{4e16}\u{754c}";
        assert_eq!(truncate_text("hello", 0), "");
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text(wide, 4), wide);
        assert_eq!(truncate_text("abcdef", 3), "abc");
        assert_eq!(truncate_text("abcdefghijklmnopqrstuvwxyz", 10), "abcdefg...");
        assert_eq!(truncate_text("\u{4e16}\u{754c}\u{4e16}\u{754c}\u{4e16}", 4), "\u{4e16}...");
    }

    #[test]
    fn truncate_text_is_idempotent() {
        let inputs = ["", "short", "abcdefghijklmnopqrstuvwxyz", "\u{1f600}\u{1f600}\u{1f600}\u{1f600}xx"];
        for s in inputs {
            for n in 0..12 {
                let once = truncate_text(s, n);
                assert_eq!(truncate_text(&once, n), once, "{s:?} / {n}");
            }
        }
    }

    #[test]
    fn truncate_html_passes_short_input() {
        let html = "<b>hello</b>";
        assert_eq!(truncate_html(html, 5), html);
        assert_eq!(truncate_html(html, 0), "");
    }

    #[test]
    fn truncate_html_closes_open_tags() {
        let html = "<b>hello <i>world</i> again</b>";
        assert_eq!(truncate_html(html, 10), "<b>hello <i>w...</i></b>");
        assert_eq!(truncate_html(html, 3), "<b>hel</b>");
    }

    #[test]
    fn truncate_html_keeps_links_intact() {
        let html = r#"<a href="https://x.com/a/status/1">Tweet</a> from someone"#;
        assert_eq!(
            truncate_html(html, 8),
            r#"<a href="https://x.com/a/status/1">Tweet</a>..."#
        );
        assert_eq!(
            truncate_html(html, 6),
            r#"<a href="https://x.com/a/status/1">Twe...</a>"#
        );
    }

    #[test]
    fn truncate_html_never_splits_entities() {
        let html = "a &amp; b &lt; c d e f";
        assert_eq!(visible_len(html), 15);
        assert_eq!(truncate_html(html, 6), "a &amp;...");
    }

    #[test]
    fn truncate_html_drops_dangling_and_stray_markup() {
        assert_eq!(truncate_html("ab</b>cdefgh", 6), "abc...");
        assert_eq!(truncate_html("abcdefgh <b", 6), "abc...");
        assert_eq!(truncate_html("<b><i>abcdef</b>ghijk", 6), "<b><i>abc...</i></b>");
    }

    #[test]
    fn truncate_html_output_is_balanced() {
        let f = Formatter::telegram();
        let p = post(
            &"long text with <tags> & entities ".repeat(10),
            "https://x.com/alice/status/1",
            "Alice",
            "alice",
        );
        let inputs = [
            f.html_content(&p, Some("Bob")),
            "<b>bold <i>italic <code>code</code></i></b> tail".to_string(),
            "<blockquote><b>x</b>yyyyyyyyyyyy</blockquote>zzzz".to_string(),
        ];
        for html in &inputs {
            for max in 0..60 {
                let out = truncate_html(html, max);
                assert!(is_balanced(&out), "{out:?} (max {max})");
                assert!(visible_len(&out) <= max, "{out:?} (max {max})");
            }
        }
    }
}
