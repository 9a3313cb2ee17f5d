use anyhow::Result;
use tracing::{info, warn};

use crate::config::Config;
use crate::dictionary::Dictionary;
use crate::platform::{IncomingMessage, Replier, Reply, ReplyTarget, TextFormat};
use crate::query::{self, Extraction, Mode};
use crate::reply;

/// Turns trigger messages into dictionary replies.
/// Platform-agnostic: receives IncomingMessage, answers through a Replier.
pub struct Relay {
    dictionary: Dictionary,
    trigger: String,
    group_tag: String,
}

impl Relay {
    pub fn new(config: &Config) -> Result<Self> {
        let dictionary = Dictionary::from_config(&config.lookup)?;
        Ok(Self::with_dictionary(
            dictionary,
            &config.telegram.trigger,
            &config.telegram.group_tag,
        ))
    }

    pub fn with_dictionary(dictionary: Dictionary, trigger: &str, group_tag: &str) -> Self {
        Self {
            dictionary,
            trigger: trigger.to_string(),
            group_tag: group_tag.to_string(),
        }
    }

    /// Decide what to send for `incoming`, running the lookup if there is one.
    /// `None` means the message is not addressed to the bot.
    pub async fn process_message(
        &self,
        incoming: &IncomingMessage,
        replier: &dyn Replier,
    ) -> Option<Reply> {
        match query::extract(incoming, &self.trigger) {
            Extraction::Ignore => None,
            Extraction::Guidance(guidance) => Some(Reply {
                text: guidance.text().to_string(),
                format: TextFormat::Plain,
                target: ReplyTarget::Trigger,
            }),
            Extraction::Query(q) => {
                info!(
                    "Lookup '{}' ({:?}) from {}",
                    q.word,
                    q.mode,
                    incoming.user_name.as_deref().unwrap_or("unknown")
                );
                replier.typing(incoming.chat_id).await;

                let meaning = self.dictionary.define(&q.word).await;
                let target = match (q.mode, &incoming.reply_to) {
                    (Mode::Reply, Some(replied)) => ReplyTarget::RepliedTo(replied.message_id),
                    _ => ReplyTarget::Trigger,
                };
                Some(Reply {
                    text: reply::compose(&q.word, &meaning, &self.group_tag),
                    format: TextFormat::Html,
                    target,
                })
            }
        }
    }

    /// Handle one message end to end. Sends at most one reply.
    pub async fn handle(&self, incoming: &IncomingMessage, replier: &dyn Replier) -> Result<()> {
        match self.process_message(incoming, replier).await {
            Some(reply) => deliver(replier, incoming, &reply).await,
            None => Ok(()),
        }
    }
}

/// Send `reply`, falling back to the triggering message when the replied-to
/// message cannot be answered (deleted, inaccessible, ...).
pub async fn deliver(replier: &dyn Replier, incoming: &IncomingMessage, reply: &Reply) -> Result<()> {
    if let ReplyTarget::RepliedTo(message_id) = reply.target {
        match replier
            .reply(incoming.chat_id, message_id, &reply.text, reply.format)
            .await
        {
            Ok(()) => return Ok(()),
            Err(e) => warn!(
                "Reply to message {} failed, answering the trigger instead: {:#}",
                message_id, e
            ),
        }
    }

    replier
        .reply(incoming.chat_id, incoming.message_id, &reply.text, reply.format)
        .await
}
