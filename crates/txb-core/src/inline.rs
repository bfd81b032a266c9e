//! Inline-query answers for a single post.

use crate::{
    formatting::Formatter,
    media::{media_hint, media_preview, mime_type_for_video, select_photo},
    post::Post,
};

/// Transport-neutral inline result; captions and message text are Telegram HTML.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InlineResult {
    Video {
        id: String,
        title: String,
        description: String,
        video_url: String,
        mime_type: String,
        thumb_url: String,
        caption: String,
        width: u32,
        height: u32,
    },
    Photo {
        id: String,
        title: String,
        description: String,
        photo_url: String,
        thumb_url: String,
        caption: String,
        width: u32,
        height: u32,
    },
    Article {
        id: String,
        title: String,
        description: String,
        message_text: String,
        url: String,
        thumb_url: String,
    },
}

impl InlineResult {
    pub fn id(&self) -> &str {
        match self {
            InlineResult::Video { id, .. }
            | InlineResult::Photo { id, .. }
            | InlineResult::Article { id, .. } => id,
        }
    }
}

pub fn build_inline_result(
    formatter: &Formatter,
    post: &Post,
    fallback_id: &str,
) -> Option<InlineResult> {
    let f = formatter.with_defaults();

    let base_id = [post.id.trim(), fallback_id.trim()]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or("tweet");

    let title = f.title(post);
    let (preview_url, preview_kind) = media_preview(post.media.as_ref());
    let description = match f.description(post) {
        d if d.is_empty() => media_hint(preview_kind).to_string(),
        d => d,
    };

    if let Some(video) = post.videos().first() {
        let video_url = video.url.trim();
        let thumb_url = match video.thumbnail_url.trim() {
            "" => preview_url.as_str(),
            t => t,
        };
        if !video_url.is_empty() && !thumb_url.is_empty() {
            return Some(InlineResult::Video {
                id: format!("{base_id}:video"),
                title,
                description,
                video_url: video_url.to_string(),
                mime_type: mime_type_for_video(&video.format),
                thumb_url: thumb_url.to_string(),
                caption: f.html_caption(post, None),
                width: video.width,
                height: video.height,
            });
        }
    }

    if let Some(photo) = select_photo(post.media.as_ref()) {
        let thumb_url = if photo.thumb_url.is_empty() {
            preview_url.clone()
        } else {
            photo.thumb_url
        };
        if !thumb_url.is_empty() {
            return Some(InlineResult::Photo {
                id: format!("{base_id}:photo"),
                title,
                description,
                photo_url: photo.url,
                thumb_url,
                caption: f.html_caption(post, None),
                width: photo.width,
                height: photo.height,
            });
        }
    }

    let message_text = f.html_message_text(post, None);
    if message_text.is_empty() {
        return None;
    }

    let thumb_url = if preview_url.is_empty() {
        post.author.avatar_url.trim().to_string()
    } else {
        preview_url
    };

    Some(InlineResult::Article {
        id: format!("{base_id}:text"),
        title,
        description,
        message_text,
        url: post.url.trim().to_string(),
        thumb_url,
    })
}
