//! Turns posts and chains into ordered transport sends.

use std::sync::Arc;

use crate::{
    callback::build_keyboard,
    chain::ChainEntry,
    context::RequestContext,
    domain::{ChatId, MessageId},
    formatting::{truncate_html, Formatter},
    media::MAX_MEDIA_GROUP_SIZE,
    messaging::{
        port::TransportPort,
        types::{GroupPhoto, InlineKeyboard, Outgoing, PhotoPayload, VideoPayload},
    },
    ports::ArticlePublisher,
    post::{Post, Video},
    Result,
};

/// Space kept free for the article link line.
const ARTICLE_LINK_RESERVE: usize = 60;
/// Space kept free for the post link line.
const POST_LINK_RESERVE: usize = 50;

/// Appends `"\n\n{marker} {url}"` to `html` truncated so the whole caption fits `ceiling`.
/// At least `min_reserve` characters are kept free for the link line.
fn with_link_line(html: &str, ceiling: usize, min_reserve: usize, marker: &str, url: &str) -> String {
    let line = format!("\n\n{marker} {url}");
    let reserve = min_reserve.max(line.chars().count());
    format!("{}{}", truncate_html(html, ceiling.saturating_sub(reserve)), line)
}

/// How one post goes out, in priority order.
#[derive(Clone, Debug, PartialEq)]
pub enum Delivery {
    Video(Video),
    /// 2..=10 photo URLs; the caption rides on the first.
    PhotoGroup(Vec<String>),
    Photo(String),
    Text,
}

impl Delivery {
    pub fn select(post: &Post) -> Self {
        if let Some(video) = post.videos().first() {
            if !video.url.is_empty() {
                return Delivery::Video(video.clone());
            }
        }

        let photos = post.photos();
        if photos.len() > 1 {
            let mut urls: Vec<String> = photos
                .iter()
                .take(MAX_MEDIA_GROUP_SIZE)
                .filter(|p| !p.url.is_empty())
                .map(|p| p.url.clone())
                .collect();
            match urls.len() {
                0 => {}
                1 => return Delivery::Photo(urls.remove(0)),
                _ => return Delivery::PhotoGroup(urls),
            }
        }

        if let [photo] = photos {
            if !photo.url.is_empty() {
                return Delivery::Photo(photo.url.clone());
            }
        }

        Delivery::Text
    }

    pub fn is_media(&self) -> bool {
        !matches!(self, Delivery::Text)
    }
}

/// One formatted post: delivery kind plus caption (media) or body (text).
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedMessage {
    pub delivery: Delivery,
    pub text: String,
}

#[derive(Clone, Debug, Default)]
pub struct SendOptions {
    pub reply_to: Option<MessageId>,
    pub keyboard: Option<InlineKeyboard>,
    pub requester: Option<String>,
}

pub struct Sender {
    transport: Arc<dyn TransportPort>,
    formatter: Formatter,
    publisher: Option<Arc<dyn ArticlePublisher>>,
}

impl Sender {
    pub fn new(transport: Arc<dyn TransportPort>, formatter: Formatter) -> Self {
        Self {
            transport,
            formatter: formatter.with_defaults(),
            publisher: None,
        }
    }

    pub fn with_publisher(mut self, publisher: Arc<dyn ArticlePublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn transport(&self) -> &Arc<dyn TransportPort> {
        &self.transport
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    pub async fn render(
        &self,
        ctx: &RequestContext,
        post: &Post,
        requester: Option<&str>,
    ) -> RenderedMessage {
        let delivery = Delivery::select(post);
        let text = if delivery.is_media() {
            self.prepare_caption(ctx, post, requester).await
        } else {
            self.formatter.html_message_text(post, requester)
        };
        RenderedMessage { delivery, text }
    }

    /// Media caption, moving overflowing text to the article publisher when one is set.
    pub async fn prepare_caption(
        &self,
        ctx: &RequestContext,
        post: &Post,
        requester: Option<&str>,
    ) -> String {
        let ceiling = self.formatter.caption_limit();
        let html = self.formatter.html_content(post, requester);

        let Some(publisher) = &self.publisher else {
            return self.formatter.html_caption(post, requester);
        };
        if html.chars().count() <= ceiling {
            return self.formatter.html_caption(post, requester);
        }

        let title = self.formatter.title(post);
        let body = self.formatter.plain_content(post);
        match ctx.run(publisher.create_article(ctx, &body, &title)).await {
            Ok(article_url) => with_link_line(&html, ceiling, ARTICLE_LINK_RESERVE, "📖", &article_url),
            Err(e) => {
                tracing::warn!(post_id = %post.id, error = %e, "article publish failed; using fallback caption");
                let url = post.url.trim();
                if url.is_empty() {
                    truncate_html(&html, ceiling)
                } else {
                    with_link_line(&html, ceiling, POST_LINK_RESERVE, "📎", url)
                }
            }
        }
    }

    /// Sends one post and returns the id to thread the next message on.
    ///
    /// `None` means nothing was sent (text-only post with an empty body).
    pub async fn render_and_send(
        &self,
        ctx: &RequestContext,
        chat_id: ChatId,
        post: &Post,
        opts: SendOptions,
    ) -> Result<Option<MessageId>> {
        let rendered = self.render(ctx, post, opts.requester.as_deref()).await;
        let out = Outgoing {
            reply_to: opts.reply_to,
            keyboard: opts.keyboard,
        };
        let transport = &self.transport;

        let sent = match rendered.delivery {
            Delivery::Video(video) => {
                let payload = VideoPayload {
                    url: video.url,
                    caption: rendered.text,
                    width: video.width,
                    height: video.height,
                };
                ctx.run(transport.send_video(chat_id, payload, out)).await?
            }
            Delivery::PhotoGroup(urls) => {
                let mut caption = Some(rendered.text);
                let items = urls
                    .into_iter()
                    .map(|url| GroupPhoto {
                        url,
                        caption: caption.take(),
                    })
                    .collect();
                // Albums cannot carry a reply keyboard.
                let out = Outgoing {
                    keyboard: None,
                    ..out
                };
                ctx.run(transport.send_photo_group(chat_id, items, out)).await?
            }
            Delivery::Photo(url) => {
                let payload = PhotoPayload {
                    url,
                    caption: rendered.text,
                };
                ctx.run(transport.send_photo(chat_id, payload, out)).await?
            }
            Delivery::Text => {
                if rendered.text.is_empty() {
                    return Ok(None);
                }
                ctx.run(transport.send_text(chat_id, &rendered.text, out)).await?
            }
        };

        tracing::debug!(chat_id = chat_id.0, post_id = %post.id, message_id = sent.0, "post delivered");
        Ok(Some(sent))
    }

    /// Sends `entries` in order, each replying to the previous message.
    ///
    /// Only the final message carries the requester line and, when `origin` is known,
    /// the delete button. The first transport failure aborts the rest; messages already
    /// sent stay in the chat.
    pub async fn send_chain(
        &self,
        ctx: &RequestContext,
        chat_id: ChatId,
        entries: &[ChainEntry],
        origin: Option<MessageId>,
        requester: Option<&str>,
    ) -> Result<()> {
        let mut prev = origin;
        let last = entries.len().saturating_sub(1);

        for (i, entry) in entries.iter().enumerate() {
            let mut opts = SendOptions {
                reply_to: prev,
                ..Default::default()
            };
            if i == last {
                opts.keyboard = origin.map(|o| build_keyboard(i64::from(o.0), None));
                opts.requester = requester.map(str::to_string);
            }

            if let Some(id) = self.render_and_send(ctx, chat_id, &entry.post, opts).await? {
                prev = Some(id);
            }
        }

        Ok(())
    }
}
