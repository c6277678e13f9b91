pub mod telegram;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    /// Stickers, photos, voice notes and anything else without a text body
    Other,
}

/// A message received from the chat platform
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub kind: MessageKind,
    /// The message text; empty for non-text messages
    pub content: String,
}

impl IncomingMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Text,
            content: content.into(),
        }
    }

    pub fn other() -> Self {
        Self {
            kind: MessageKind::Other,
            content: String::new(),
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind == MessageKind::Text
    }
}

/// Plain-text reply sent back to the chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
