//! Console adapter for development/testing

use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use crate::application::messaging::{DispatchOutcome, MessageDispatcher};
use crate::domain::entities::{ChannelKind, Message, User};
use crate::domain::traits::{Bot, BotInfo};
use crate::application::errors::BotError;

const CONSOLE_CHANNEL: &str = "console";

/// Console bot adapter for local development
pub struct ConsoleAdapter {
    info: BotInfo,
    channel: ChannelKind,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: "herald-bot".to_string(),
            },
            channel: ChannelKind::Guild,
        }
    }

    /// Treat console input as direct messages instead of guild messages
    pub fn direct(mut self) -> Self {
        self.channel = ChannelKind::Direct;
        self
    }

    /// Wrap a line of input as a message from the local user
    pub fn message(&self, text: &str) -> Message {
        let author = User::new("console-user").with_name("you");
        let message = Message::new(CONSOLE_CHANNEL, author, text);
        match self.channel {
            ChannelKind::Direct => message.with_channel(ChannelKind::Direct),
            ChannelKind::Guild => message.in_guild("console"),
        }
    }

    /// Read stdin line by line and dispatch each line until EOF
    pub async fn run(&self, dispatcher: Arc<MessageDispatcher>) -> Result<(), BotError> {
        tracing::info!(
            "Starting console bot (dev mode, {} channel, prefix '{}')",
            self.channel.as_str(),
            dispatcher.prefix()
        );

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| BotError::Internal(format!("Failed to read stdin: {}", e)))?
        {
            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            let message = self.message(input);
            match dispatcher.dispatch(self, &message).await {
                DispatchOutcome::Ignored => {}
                outcome => tracing::debug!("Dispatch outcome: {:?}", outcome),
            }
        }

        tracing::info!("Console input closed");
        Ok(())
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn send_message(&self, _channel_id: &str, text: &str) -> Result<String, BotError> {
        println!("[BOT] {}", text);
        Ok(uuid::Uuid::new_v4().to_string())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guild_messages_by_default() {
        let message = ConsoleAdapter::new().message("!ping");
        assert_eq!(message.channel, ChannelKind::Guild);
        assert_eq!(message.guild_id.as_deref(), Some("console"));
        assert!(!message.author.is_bot);
    }

    #[test]
    fn test_direct_mode() {
        let message = ConsoleAdapter::new().direct().message("!ping");
        assert!(message.is_direct());
        assert!(message.guild_id.is_none());
    }
}
