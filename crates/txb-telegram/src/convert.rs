//! Core inline results → teloxide inline query results.

use teloxide::types::{
    InlineQueryResult, InlineQueryResultArticle, InlineQueryResultPhoto, InlineQueryResultVideo,
    InputMessageContent, InputMessageContentText, ParseMode,
};
use txb_core::{errors::Error, inline::InlineResult, Result};

use crate::media_url;

pub fn inline_query_result(result: InlineResult) -> Result<InlineQueryResult> {
    Ok(match result {
        InlineResult::Video {
            id,
            title,
            description,
            video_url,
            mime_type,
            thumb_url,
            caption,
            width,
            height,
        } => {
            let mime: mime::Mime = mime_type
                .parse()
                .or_else(|_| "video/mp4".parse())
                .map_err(|e| Error::Transport(format!("invalid mime type {mime_type:?}: {e}")))?;
            let mut v = InlineQueryResultVideo::new(
                id,
                media_url(&video_url)?,
                mime,
                media_url(&thumb_url)?,
                title,
            )
            .caption(caption)
            .parse_mode(ParseMode::Html)
            .description(description);
            if width > 0 && height > 0 {
                v = v.video_width(width as i32).video_height(height as i32);
            }
            InlineQueryResult::Video(v)
        }
        InlineResult::Photo {
            id,
            title,
            description,
            photo_url,
            thumb_url,
            caption,
            width,
            height,
        } => {
            let mut p = InlineQueryResultPhoto::new(id, media_url(&photo_url)?, media_url(&thumb_url)?)
                .title(title)
                .description(description)
                .caption(caption)
                .parse_mode(ParseMode::Html);
            if width > 0 && height > 0 {
                p = p.photo_width(width as i32).photo_height(height as i32);
            }
            InlineQueryResult::Photo(p)
        }
        InlineResult::Article {
            id,
            title,
            description,
            message_text,
            url,
            thumb_url,
        } => {
            let content = InputMessageContent::Text(
                InputMessageContentText::new(message_text).parse_mode(ParseMode::Html),
            );
            let mut a = InlineQueryResultArticle::new(id, title, content).description(description);
            if let Ok(u) = media_url(&url) {
                a = a.url(u);
            }
            if let Ok(u) = media_url(&thumb_url) {
                a = a.thumb_url(u);
            }
            InlineQueryResult::Article(a)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_without_urls_still_converts() {
        let res = inline_query_result(InlineResult::Article {
            id: "1:text".to_string(),
            title: "Tweet".to_string(),
            description: String::new(),
            message_text: "Tweet".to_string(),
            url: String::new(),
            thumb_url: String::new(),
        })
        .unwrap();
        match res {
            InlineQueryResult::Article(a) => {
                assert_eq!(a.id, "1:text");
                assert!(a.url.is_none());
                assert!(a.thumb_url.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn video_requires_absolute_urls() {
        let mk = |url: &str| InlineResult::Video {
            id: "1:video".to_string(),
            title: "Tweet".to_string(),
            description: "Video".to_string(),
            video_url: url.to_string(),
            mime_type: "video/mp4".to_string(),
            thumb_url: "https://v/1.jpg".to_string(),
            caption: String::new(),
            width: 640,
            height: 360,
        };
        assert!(matches!(
            inline_query_result(mk("https://v/1.mp4")),
            Ok(InlineQueryResult::Video(_))
        ));
        assert!(inline_query_result(mk("1.mp4")).is_err());
    }
}
