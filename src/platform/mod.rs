pub mod telegram;

use anyhow::Result;
use async_trait::async_trait;

/// A message received from the chat platform
#[derive(Debug, Clone, Default)]
pub struct IncomingMessage {
    pub chat_id: i64,
    pub message_id: i32,
    /// Display name of the sender, for logging only
    pub user_name: Option<String>,
    /// The message text (empty when the message has none)
    pub text: String,
    /// The message this one replies to, if any
    pub reply_to: Option<RepliedMessage>,
}

/// The message an incoming message replies to
#[derive(Debug, Clone, Default)]
pub struct RepliedMessage {
    pub message_id: i32,
    pub text: Option<String>,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    Html,
}

/// Which message an outgoing reply threads onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyTarget {
    /// The message that triggered the lookup
    Trigger,
    /// The message the trigger replied to; falls back to `Trigger` on failure
    RepliedTo(i32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub format: TextFormat,
    pub target: ReplyTarget,
}

/// Outbound side of a chat platform.
#[async_trait]
pub trait Replier: Send + Sync {
    /// Send `text` in `chat_id` as a reply to `message_id`.
    async fn reply(
        &self,
        chat_id: i64,
        message_id: i32,
        text: &str,
        format: TextFormat,
    ) -> Result<()>;

    /// Best-effort "typing" indicator while a lookup runs.
    async fn typing(&self, _chat_id: i64) {}
}
