//! Extract `(handle, id)` from a Twitter/X status URL embedded in free text.

use std::sync::OnceLock;

use regex::Regex;

use crate::post::PostRef;

fn post_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:https?://)?(?:www\.)?(?:twitter\.com|x\.com)/([^/]+)/status/([0-9]+)")
            .expect("valid regex")
    })
}

/// Returns the first post URL found in `text`, if any.
///
/// Matching is substring-based: surrounding text, trailing path segments and query
/// strings are ignored, and only the numeric prefix of the id is taken.
pub fn parse_post_url(text: &str) -> Option<PostRef> {
    let caps = post_url_re().captures(text)?;
    Some(PostRef::new(&caps[1], &caps[2]))
}
