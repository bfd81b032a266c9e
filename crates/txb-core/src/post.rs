//! Post model as returned by the upstream API.
//!
//! Values are created fresh per fetch and never mutated afterwards.

use std::collections::HashMap;

use serde::Deserialize;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub author: Author,
    /// Handle of the post this one replies to.
    #[serde(default)]
    pub replying_to: Option<String>,
    /// Id of the post this one replies to.
    #[serde(default)]
    pub replying_to_status: Option<String>,
    #[serde(default)]
    pub quote: Option<Box<Post>>,
    #[serde(default)]
    pub media: Option<Media>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub screen_name: String,
    #[serde(default)]
    pub avatar_url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Media {
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub videos: Vec<Video>,
    #[serde(default)]
    pub mosaic: Option<Mosaic>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Photo {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Video {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub format: String,
}

/// Pre-composited multi-photo preview.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Mosaic {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// Image URLs keyed by format ("jpeg", "jpg", "webp", ...).
    #[serde(default)]
    pub formats: HashMap<String, String>,
}

/// `(handle, id)` pair identifying a post upstream.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PostRef {
    pub handle: String,
    pub post_id: String,
}

impl PostRef {
    pub fn new(handle: impl Into<String>, post_id: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            post_id: post_id.into(),
        }
    }
}

impl Post {
    /// True when the upstream marks this post as a reply.
    pub fn is_reply(&self) -> bool {
        self.replying_to_status
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }

    /// The resolvable ancestor, if both its handle and id are known.
    pub fn ancestor(&self) -> Option<PostRef> {
        let handle = self.replying_to.as_deref().map(str::trim)?;
        let id = self.replying_to_status.as_deref().map(str::trim)?;
        if handle.is_empty() || id.is_empty() {
            return None;
        }
        Some(PostRef::new(handle, id))
    }

    pub fn photos(&self) -> &[Photo] {
        self.media.as_ref().map(|m| m.photos.as_slice()).unwrap_or(&[])
    }

    pub fn videos(&self) -> &[Video] {
        self.media.as_ref().map(|m| m.videos.as_slice()).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_upstream_payload() {
        let raw = r#"{
            "id": "2",
            "url": "https://x.com/bob/status/2",
            "text": "reply",
            "author": {"name": "Bob", "screen_name": "bob", "avatar_url": "https://a/b.png"},
            "replying_to": "alice",
            "replying_to_status": "1",
            "quote": {"id": "0", "text": "quoted", "author": {"screen_name": "dave"}},
            "media": {
                "photos": [{"url": "https://p/1.jpg", "width": 10, "height": 20}],
                "mosaic": {"type": "mosaic_photo", "formats": {"jpeg": "https://m.jpeg"}}
            }
        }"#;
        let post: Post = serde_json::from_str(raw).unwrap();
        assert_eq!(post.ancestor(), Some(PostRef::new("alice", "1")));
        assert!(post.is_reply());
        assert_eq!(post.quote.as_ref().unwrap().author.screen_name, "dave");
        assert_eq!(post.photos()[0].height, 20);
        assert!(post.videos().is_empty());
        let mosaic = post.media.unwrap().mosaic.unwrap();
        assert_eq!(mosaic.width, None);
        assert_eq!(mosaic.formats["jpeg"], "https://m.jpeg");
    }

    #[test]
    fn ancestor_requires_handle() {
        let post = Post {
            replying_to_status: Some("1".to_string()),
            ..Default::default()
        };
        assert!(post.is_reply());
        assert_eq!(post.ancestor(), None);
    }
}
