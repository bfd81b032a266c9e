//! Action tokens carried in inline-button callback data.
//!
//! Wire format (stable, button payloads already in chats depend on it):
//!
//! * `chain:<handle>:<postId>:<originMessageId>`
//! * `del:<originMessageId>[|<handle>|<postId>]`
//!
//! Telegram limits callback data to 64 bytes. Handles and ids must not contain the
//! `:`/`|` separators.

use crate::{
    messaging::types::{InlineButton, InlineKeyboard},
    post::PostRef,
};

pub const CHAIN_PREFIX: &str = "chain:";
pub const DELETE_PREFIX: &str = "del:";
pub const MAX_CALLBACK_DATA_LEN: usize = 64;

pub const CHAIN_BUTTON_LABEL: &str = "Send full chain";
pub const DELETE_BUTTON_LABEL: &str = "Delete original";

/// "Send full chain" payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainToken {
    pub handle: String,
    pub post_id: String,
    /// The user message the chain should reply to.
    pub origin_message_id: i64,
}

/// "Delete original" payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeleteToken {
    pub origin_message_id: i64,
    /// Present when the keyboard also shows the chain button, so it can be rebuilt
    /// after the delete.
    pub chain: Option<PostRef>,
}

/// Decoded callback data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionToken {
    Chain(ChainToken),
    Delete(DeleteToken),
}

impl ChainToken {
    pub fn new(handle: impl Into<String>, post_id: impl Into<String>, origin: i64) -> Self {
        Self {
            handle: handle.into(),
            post_id: post_id.into(),
            origin_message_id: origin,
        }
    }

    pub fn encode(&self) -> String {
        format!(
            "{CHAIN_PREFIX}{}:{}:{}",
            self.handle, self.post_id, self.origin_message_id
        )
    }

    pub fn decode(data: &str) -> Option<Self> {
        let rest = data.strip_prefix(CHAIN_PREFIX)?;
        let mut parts = rest.splitn(3, ':');
        let handle = parts.next().filter(|s| !s.is_empty())?;
        let post_id = parts.next().filter(|s| !s.is_empty())?;
        let origin = parts.next().filter(|s| !s.is_empty())?;
        let origin = origin.parse::<i64>().ok()?;
        Some(Self::new(handle, post_id, origin))
    }
}

impl DeleteToken {
    pub fn new(origin: i64, chain: Option<PostRef>) -> Self {
        Self {
            origin_message_id: origin,
            chain,
        }
    }

    pub fn encode(&self) -> String {
        match &self.chain {
            Some(c) => format!(
                "{DELETE_PREFIX}{}|{}|{}",
                self.origin_message_id, c.handle, c.post_id
            ),
            None => format!("{DELETE_PREFIX}{}", self.origin_message_id),
        }
    }

    pub fn decode(data: &str) -> Option<Self> {
        let rest = data.strip_prefix(DELETE_PREFIX)?;
        if rest.is_empty() {
            return None;
        }

        let mut parts = rest.splitn(3, '|');
        let origin = parts.next()?.parse::<i64>().ok()?;
        let chain = match (parts.next(), parts.next()) {
            (Some(handle), Some(post_id)) if !handle.is_empty() && !post_id.is_empty() => {
                Some(PostRef::new(handle, post_id))
            }
            _ => None,
        };

        Some(Self::new(origin, chain))
    }

    /// The chain token to re-offer once the origin message is gone.
    pub fn chain_token(&self) -> Option<ChainToken> {
        self.chain
            .as_ref()
            .map(|c| ChainToken::new(&c.handle, &c.post_id, self.origin_message_id))
    }
}

impl ActionToken {
    pub fn encode(&self) -> String {
        match self {
            ActionToken::Chain(t) => t.encode(),
            ActionToken::Delete(t) => t.encode(),
        }
    }

    pub fn decode(data: &str) -> Option<Self> {
        if data.starts_with(CHAIN_PREFIX) {
            return ChainToken::decode(data).map(ActionToken::Chain);
        }
        if data.starts_with(DELETE_PREFIX) {
            return DeleteToken::decode(data).map(ActionToken::Delete);
        }
        None
    }
}

/// Which buttons a delivered post offers besides "Delete original".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyboardOptions {
    pub show_chain_button: bool,
    pub chain: Option<PostRef>,
}

impl KeyboardOptions {
    pub fn with_chain(chain: PostRef) -> Self {
        Self {
            show_chain_button: true,
            chain: Some(chain),
        }
    }

    fn shown_chain(&self) -> Option<&PostRef> {
        if self.show_chain_button {
            self.chain.as_ref()
        } else {
            None
        }
    }
}

/// One row: optional "Send full chain" followed by "Delete original".
pub fn build_keyboard(origin: i64, opts: Option<&KeyboardOptions>) -> InlineKeyboard {
    let chain = opts.and_then(KeyboardOptions::shown_chain);

    let mut buttons = Vec::with_capacity(2);
    if let Some(c) = chain {
        buttons.push(InlineButton::new(
            CHAIN_BUTTON_LABEL,
            ChainToken::new(&c.handle, &c.post_id, origin).encode(),
        ));
    }
    buttons.push(InlineButton::new(
        DELETE_BUTTON_LABEL,
        DeleteToken::new(origin, chain.cloned()).encode(),
    ));

    InlineKeyboard::single_row(buttons)
}

pub fn chain_only_keyboard(token: &ChainToken) -> InlineKeyboard {
    InlineKeyboard::single_row(vec![InlineButton::new(
        CHAIN_BUTTON_LABEL,
        token.encode(),
    )])
}
