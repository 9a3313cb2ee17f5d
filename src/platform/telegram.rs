use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, MessageId, ParseMode, ReplyParameters};
use teloxide::utils::command::BotCommands;
use tracing::{debug, error, info, warn};

use crate::platform::{IncomingMessage, RepliedMessage, Replier, TextFormat};
use crate::relay::Relay;

const START_TEXT: &str = "ربات دهخدا آماده‌ست.\nروش استفاده:\n— روی پیامِ کلمه (مثلاً `آسمان`) ریپلای کن و فقط بنویس `دهخدا`.\n— یا تایپ کن `دهخدا کلمه`";

#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase")]
enum Command {
    #[command(description = "راهنمای استفاده")]
    Start,
}

/// Sends replies through the Bot API
pub struct TelegramReplier {
    bot: Bot,
}

impl TelegramReplier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Replier for TelegramReplier {
    async fn reply(
        &self,
        chat_id: i64,
        message_id: i32,
        text: &str,
        format: TextFormat,
    ) -> Result<()> {
        let mut request = self
            .bot
            .send_message(ChatId(chat_id), text)
            .reply_parameters(ReplyParameters::new(MessageId(message_id)));
        if format == TextFormat::Html {
            request = request.parse_mode(ParseMode::Html);
        }

        request
            .await
            .with_context(|| format!("Failed to reply to message {} in chat {}", message_id, chat_id))?;
        Ok(())
    }

    async fn typing(&self, chat_id: i64) {
        self.bot
            .send_chat_action(ChatId(chat_id), ChatAction::Typing)
            .await
            .ok();
    }
}

/// Build the platform-agnostic view of a Telegram message
fn to_incoming(msg: &Message) -> IncomingMessage {
    IncomingMessage {
        chat_id: msg.chat.id.0,
        message_id: msg.id.0,
        user_name: msg.from.as_ref().map(|user| user.first_name.clone()),
        text: msg.text().unwrap_or_default().to_string(),
        reply_to: msg.reply_to_message().map(|replied| RepliedMessage {
            message_id: replied.id.0,
            text: replied.text().map(str::to_string),
            caption: replied.caption().map(str::to_string),
        }),
    }
}

/// Run the Telegram bot platform
pub async fn run(relay: Arc<Relay>, bot_token: &str) -> Result<()> {
    let bot = Bot::new(bot_token);

    info!("Starting Telegram platform...");

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!("Failed to register bot commands: {}", e);
    }

    let handler = Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(
            dptree::filter(|msg: Message| msg.text().is_some_and(|text| !text.starts_with('/')))
                .endpoint(handle_message),
        );

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![relay])
        .default_handler(|upd| async move {
            debug!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("telegram"))
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_command(bot: Bot, msg: Message, cmd: Command) -> ResponseResult<()> {
    match cmd {
        Command::Start => {
            bot.send_message(msg.chat.id, START_TEXT)
                .reply_parameters(ReplyParameters::new(msg.id))
                .await?;
        }
    }
    Ok(())
}

async fn handle_message(bot: Bot, msg: Message, relay: Arc<Relay>) -> ResponseResult<()> {
    let incoming = to_incoming(&msg);
    let replier = TelegramReplier::new(bot);

    if let Err(e) = relay.handle(&incoming, &replier).await {
        error!("Failed to answer message {} in chat {}: {:#}", incoming.message_id, incoming.chat_id, e);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_command_parses() {
        assert!(matches!(
            Command::parse("/start", "dehkhoda_bot"),
            Ok(Command::Start)
        ));
        assert!(matches!(
            Command::parse("/start@dehkhoda_bot", "dehkhoda_bot"),
            Ok(Command::Start)
        ));
        assert!(Command::parse("/help", "dehkhoda_bot").is_err());
    }

    #[test]
    fn test_start_text_explains_both_modes() {
        assert!(START_TEXT.contains("دهخدا کلمه"));
        assert!(START_TEXT.contains("ریپلای"));
    }
}
