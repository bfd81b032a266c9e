//! Media selection helpers shared by delivery and inline results.

use crate::post::{Media, Mosaic};

/// Telegram's sendMediaGroup accepts at most 10 items.
pub const MAX_MEDIA_GROUP_SIZE: usize = 10;

const DEFAULT_VIDEO_MIME: &str = "video/mp4";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhotoSelection {
    pub url: String,
    pub thumb_url: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreviewKind {
    Video,
    Mosaic,
    Photo,
    None,
}

impl PreviewKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PreviewKind::Video => "video",
            PreviewKind::Mosaic => "mosaic",
            PreviewKind::Photo => "photo",
            PreviewKind::None => "",
        }
    }
}

/// Single image representing the post: the mosaic for multi-photo posts, else the first photo.
pub fn select_photo(media: Option<&Media>) -> Option<PhotoSelection> {
    let media = media?;

    if media.photos.len() > 1 {
        if let Some(mosaic) = &media.mosaic {
            if let Some(url) = pick_mosaic_url(mosaic) {
                let (width, height) = mosaic_dimensions(mosaic);
                return Some(PhotoSelection {
                    thumb_url: url.clone(),
                    url,
                    width,
                    height,
                });
            }
        }
    }

    let photo = media.photos.first()?;
    if photo.url.is_empty() {
        return None;
    }
    Some(PhotoSelection {
        url: photo.url.clone(),
        thumb_url: photo.url.clone(),
        width: photo.width,
        height: photo.height,
    })
}

/// Preview image URL and where it came from: video thumbnail, mosaic, first photo.
pub fn media_preview(media: Option<&Media>) -> (String, PreviewKind) {
    let Some(media) = media else {
        return (String::new(), PreviewKind::None);
    };

    if let Some(video) = media.videos.first() {
        if !video.thumbnail_url.is_empty() {
            return (video.thumbnail_url.clone(), PreviewKind::Video);
        }
    }

    if media.photos.len() > 1 {
        if let Some(url) = media.mosaic.as_ref().and_then(pick_mosaic_url) {
            return (url, PreviewKind::Mosaic);
        }
    }

    match media.photos.first() {
        Some(photo) if !photo.url.is_empty() => (photo.url.clone(), PreviewKind::Photo),
        _ => (String::new(), PreviewKind::None),
    }
}

/// Human label for a preview kind, used when a post has no text.
pub fn media_hint(kind: PreviewKind) -> &'static str {
    match kind {
        PreviewKind::Video => "Video",
        PreviewKind::Mosaic => "Mosaic",
        PreviewKind::Photo => "Photo",
        PreviewKind::None => "",
    }
}

pub fn pick_mosaic_url(mosaic: &Mosaic) -> Option<String> {
    ["jpeg", "jpg"]
        .iter()
        .filter_map(|fmt| mosaic.formats.get(*fmt))
        .find(|url| !url.is_empty())
        .cloned()
}

pub fn mosaic_dimensions(mosaic: &Mosaic) -> (u32, u32) {
    (mosaic.width.unwrap_or(0), mosaic.height.unwrap_or(0))
}

pub fn mime_type_for_video(format: &str) -> String {
    let format = format.trim();
    if format.is_empty() {
        return DEFAULT_VIDEO_MIME.to_string();
    }
    if format.contains('/') {
        return format.to_string();
    }
    format!("video/{format}")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::post::{Photo, Video};

    fn photo(url: &str) -> Photo {
        Photo {
            url: url.to_string(),
            width: 100,
            height: 50,
        }
    }

    fn mosaic(formats: &[(&str, &str)]) -> Mosaic {
        Mosaic {
            width: Some(800),
            height: Some(600),
            formats: formats
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn select_photo_uses_first_photo() {
        let media = Media {
            photos: vec![photo("https://img/1.jpg")],
            ..Default::default()
        };
        let sel = select_photo(Some(&media)).unwrap();
        assert_eq!(sel.url, "https://img/1.jpg");
        assert_eq!(sel.thumb_url, "https://img/1.jpg");
        assert_eq!((sel.width, sel.height), (100, 50));
        assert_eq!(select_photo(None), None);
        assert_eq!(select_photo(Some(&Media::default())), None);
    }

    #[test]
    fn select_photo_prefers_mosaic_for_many_photos() {
        let media = Media {
            photos: vec![photo("https://img/1.jpg"), photo("https://img/2.jpg")],
            mosaic: Some(mosaic(&[("webp", "https://m/x.webp"), ("jpg", "https://m/x.jpg")])),
            ..Default::default()
        };
        let sel = select_photo(Some(&media)).unwrap();
        assert_eq!(sel.url, "https://m/x.jpg");
        assert_eq!((sel.width, sel.height), (800, 600));
    }

    #[test]
    fn select_photo_falls_back_without_usable_mosaic() {
        let media = Media {
            photos: vec![photo("https://img/1.jpg"), photo("https://img/2.jpg")],
            mosaic: Some(mosaic(&[("webp", "https://m/x.webp")])),
            ..Default::default()
        };
        assert_eq!(select_photo(Some(&media)).unwrap().url, "https://img/1.jpg");
    }

    #[test]
    fn mosaic_prefers_jpeg() {
        let m = mosaic(&[("jpg", "https://m/b.jpg"), ("jpeg", "https://m/a.jpeg")]);
        assert_eq!(pick_mosaic_url(&m).as_deref(), Some("https://m/a.jpeg"));
        let m = mosaic(&[("jpeg", ""), ("jpg", "https://m/b.jpg")]);
        assert_eq!(pick_mosaic_url(&m).as_deref(), Some("https://m/b.jpg"));
        assert_eq!(pick_mosaic_url(&Mosaic::default()), None);
        assert_eq!(mosaic_dimensions(&Mosaic::default()), (0, 0));
    }

    #[test]
    fn preview_priority() {
        let media = Media {
            photos: vec![photo("https://img/1.jpg"), photo("https://img/2.jpg")],
            videos: vec![Video {
                url: "https://v/1.mp4".to_string(),
                thumbnail_url: "https://v/1.jpg".to_string(),
                ..Default::default()
            }],
            mosaic: Some(mosaic(&[("jpeg", "https://m/a.jpeg")])),
        };
        assert_eq!(
            media_preview(Some(&media)),
            ("https://v/1.jpg".to_string(), PreviewKind::Video)
        );

        let no_video = Media {
            videos: vec![],
            ..media.clone()
        };
        assert_eq!(
            media_preview(Some(&no_video)),
            ("https://m/a.jpeg".to_string(), PreviewKind::Mosaic)
        );

        let single = Media {
            photos: vec![photo("https://img/1.jpg")],
            ..Default::default()
        };
        assert_eq!(
            media_preview(Some(&single)),
            ("https://img/1.jpg".to_string(), PreviewKind::Photo)
        );
        assert_eq!(media_preview(None), (String::new(), PreviewKind::None));
    }

    #[test]
    fn hints_and_kinds() {
        assert_eq!(media_hint(PreviewKind::Video), "Video");
        assert_eq!(media_hint(PreviewKind::Mosaic), "Mosaic");
        assert_eq!(media_hint(PreviewKind::Photo), "Photo");
        assert_eq!(media_hint(PreviewKind::None), "");
        assert_eq!(PreviewKind::Mosaic.as_str(), "mosaic");
        assert_eq!(PreviewKind::None.as_str(), "");
    }

    #[test]
    fn video_mime_types() {
        assert_eq!(mime_type_for_video(""), "video/mp4");
        assert_eq!(mime_type_for_video("mp4"), "video/mp4");
        assert_eq!(mime_type_for_video("webm"), "video/webm");
        assert_eq!(mime_type_for_video("application/x-mpegURL"), "application/x-mpegURL");
    }
}
