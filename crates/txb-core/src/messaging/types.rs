/// Inline keyboard (rows of callback buttons).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub callback_data: String,
}

impl InlineButton {
    pub fn new(label: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            callback_data: callback_data.into(),
        }
    }
}

impl InlineKeyboard {
    pub fn single_row(buttons: Vec<InlineButton>) -> Self {
        Self {
            rows: vec![buttons],
        }
    }

    pub fn buttons(&self) -> impl Iterator<Item = &InlineButton> {
        self.rows.iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons().next().is_none()
    }
}

/// Video payload sent by URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoPayload {
    pub url: String,
    pub caption: String,
    pub width: u32,
    pub height: u32,
}

/// Photo payload sent by URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhotoPayload {
    pub url: String,
    pub caption: String,
}

/// Album item; only the first item of a group carries a caption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupPhoto {
    pub url: String,
    pub caption: Option<String>,
}

/// Common per-send options: reply linkage and the interactive keyboard.
///
/// `reply_to` is always sent with "allow sending without reply", so a deleted
/// target never fails delivery.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outgoing {
    pub reply_to: Option<crate::domain::MessageId>,
    pub keyboard: Option<InlineKeyboard>,
}
