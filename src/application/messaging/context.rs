//! Context handed to a command's executor

use std::time::Duration;

use crate::application::errors::CommandError;
use crate::domain::entities::{CommandRegistry, Message};
use crate::domain::traits::Bot;
use crate::infrastructure::config::Secrets;

/// Everything a command may use while it runs.
///
/// Borrowed for the duration of one dispatch.
#[derive(Clone, Copy)]
pub struct CommandContext<'a> {
    pub message: &'a Message,
    pub args: &'a [String],
    pub bot: &'a dyn Bot,
    pub secrets: &'a Secrets,
    pub registry: &'a CommandRegistry,
    pub prefix: &'a str,
    pub default_cooldown: Duration,
}

impl<'a> CommandContext<'a> {
    /// Reply to the invoking user
    pub async fn reply(&self, text: &str) -> Result<(), CommandError> {
        self.bot
            .reply(self.message, text)
            .await
            .map(|_| ())
            .map_err(|e| CommandError::Reply(e.to_string()))
    }

    /// Send a plain message to the origin channel
    pub async fn send(&self, text: &str) -> Result<(), CommandError> {
        self.bot
            .send_message(&self.message.channel_id, text)
            .await
            .map(|_| ())
            .map_err(|e| CommandError::Reply(e.to_string()))
    }

    pub fn arg(&self, index: usize) -> Option<&'a str> {
        self.args.get(index).map(String::as_str)
    }
}
