//! Message dispatcher - Routes messages to commands
//!
//! Each message runs through a fixed sequence of gates and stops at the
//! first one that rejects it: prefix/bot filter, command resolution,
//! guild-only check, argument presence, cooldown, then execution.

use chrono::{DateTime, Utc};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use crate::application::errors::{BotError, CommandError};
use crate::domain::entities::{Command, CommandRegistry, Message};
use crate::domain::traits::Bot;
use crate::infrastructure::config::Secrets;
use super::context::CommandContext;
use super::cooldown::{format_remaining, CooldownStatus, CooldownTracker};
use super::parser::MessageParser;

pub const GUILD_ONLY_REPLY: &str = "I can't execute that command inside DMs!";
pub const EXECUTION_FAILED_REPLY: &str = "There was an error trying to execute that command!";

/// Where a message ended up
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// No prefix, or authored by a bot
    Ignored,
    /// No command or alias matched
    Unknown(String),
    /// Guild-only command used in a direct message
    GuildOnly(String),
    /// Command needs arguments and got none
    MissingArgs(String),
    /// User is still inside the cooldown window
    CoolingDown { command: String, remaining: Duration },
    /// Command ran to completion
    Executed(String),
    /// Command returned an error or panicked
    Failed { command: String, error: String },
}

/// Message dispatcher - owns the parser and shares registry and cooldown state
pub struct MessageDispatcher {
    parser: MessageParser,
    registry: Arc<CommandRegistry>,
    cooldowns: Arc<CooldownTracker>,
    default_cooldown: Duration,
    secrets: Arc<Secrets>,
}

impl MessageDispatcher {
    pub fn new(
        prefix: impl Into<String>,
        registry: Arc<CommandRegistry>,
        cooldowns: Arc<CooldownTracker>,
    ) -> Self {
        Self {
            parser: MessageParser::new(prefix),
            registry,
            cooldowns,
            default_cooldown: Duration::from_secs(3),
            secrets: Arc::new(Secrets::default()),
        }
    }

    pub fn with_default_cooldown(mut self, cooldown: Duration) -> Self {
        self.default_cooldown = cooldown;
        self
    }

    pub fn with_secrets(mut self, secrets: Arc<Secrets>) -> Self {
        self.secrets = secrets;
        self
    }

    pub fn prefix(&self) -> &str {
        self.parser.prefix()
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn cooldowns(&self) -> &CooldownTracker {
        &self.cooldowns
    }

    /// Dispatch a message, timing cooldowns by when it was received
    pub async fn dispatch(&self, bot: &dyn Bot, message: &Message) -> DispatchOutcome {
        self.dispatch_at(bot, message, message.timestamp).await
    }

    /// Dispatch a message as if it arrived at `now`
    pub async fn dispatch_at(&self, bot: &dyn Bot, message: &Message, now: DateTime<Utc>) -> DispatchOutcome {
        if message.author.is_bot {
            return DispatchOutcome::Ignored;
        }
        let Some(invocation) = self.parser.parse(&message.content) else {
            return DispatchOutcome::Ignored;
        };

        let Some(command) = self.registry.resolve(&invocation.name) else {
            tracing::debug!("[{}] No command matches '{}'", message.channel_id, invocation.name);
            return DispatchOutcome::Unknown(invocation.name);
        };

        if command.guild_only && message.is_direct() {
            deliver(bot.reply(message, GUILD_ONLY_REPLY).await, message);
            return DispatchOutcome::GuildOnly(command.name.clone());
        }

        if command.requires_args && invocation.args.is_empty() {
            let text = self.missing_args_text(command, message);
            deliver(bot.send_message(&message.channel_id, &text).await, message);
            return DispatchOutcome::MissingArgs(command.name.clone());
        }

        let cooldown = command.cooldown_or(self.default_cooldown);
        if let CooldownStatus::Active { remaining } =
            self.cooldowns.check_and_stamp(&command.name, &message.author.id, cooldown, now)
        {
            let text = cooldown_text(&command.name, remaining);
            deliver(bot.reply(message, &text).await, message);
            return DispatchOutcome::CoolingDown {
                command: command.name.clone(),
                remaining,
            };
        }

        self.execute(bot, message, command, &invocation.args).await
    }

    async fn execute(
        &self,
        bot: &dyn Bot,
        message: &Message,
        command: &Command,
        args: &[String],
    ) -> DispatchOutcome {
        tracing::debug!("Executing command {} with args {:?}", command.name, args);

        let ctx = CommandContext {
            message,
            args,
            bot,
            secrets: &self.secrets,
            registry: &self.registry,
            prefix: self.parser.prefix(),
            default_cooldown: self.default_cooldown,
        };

        let result = match command.executor() {
            Some(executor) => AssertUnwindSafe(executor.execute(ctx))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| Err(CommandError::ExecutionFailed(panic_message(panic)))),
            None => Err(CommandError::ExecutionFailed("command has no executor".to_string())),
        };

        match result {
            Ok(()) => DispatchOutcome::Executed(command.name.clone()),
            Err(e) => {
                tracing::error!(
                    command = %command.name,
                    user = %message.author.id,
                    channel = %message.channel_id,
                    "Command failed: {:?}",
                    e
                );
                deliver(bot.reply(message, EXECUTION_FAILED_REPLY).await, message);
                DispatchOutcome::Failed {
                    command: command.name.clone(),
                    error: e.to_string(),
                }
            }
        }
    }

    fn missing_args_text(&self, command: &Command, message: &Message) -> String {
        let mut text = format!("You didn't provide any arguments, {}!", message.author.mention());
        if let Some(usage) = &command.usage {
            text.push_str(&format!(
                "\nThe proper usage would be: `{}{} {}`",
                self.parser.prefix(),
                command.name,
                usage
            ));
        }
        text
    }
}

/// Wait notice with "second" only for exactly 1.0
pub fn cooldown_text(command: &str, remaining: Duration) -> String {
    let seconds = format_remaining(remaining);
    let unit = if seconds == "1.0" { "second" } else { "seconds" };
    format!(
        "Please wait {} more {} before reusing the {} command.",
        seconds, unit, command
    )
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    let detail = match panic.downcast::<String>() {
        Ok(text) => *text,
        Err(panic) => match panic.downcast_ref::<&str>() {
            Some(text) => text.to_string(),
            None => "unknown panic".to_string(),
        },
    };
    format!("command panicked: {}", detail)
}

fn deliver<T>(result: Result<T, BotError>, message: &Message) {
    if let Err(e) = result {
        tracing::warn!("[{}] Failed to send response: {}", message.channel_id, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_text_plural() {
        assert_eq!(
            cooldown_text("ping", Duration::from_millis(5_000)),
            "Please wait 5.0 more seconds before reusing the ping command."
        );
        assert_eq!(
            cooldown_text("ping", Duration::from_millis(400)),
            "Please wait 0.4 more seconds before reusing the ping command."
        );
    }

    #[test]
    fn test_cooldown_text_rounds_halves_up() {
        assert_eq!(
            cooldown_text("ping", Duration::from_millis(1_250)),
            "Please wait 1.3 more seconds before reusing the ping command."
        );
    }

    #[test]
    fn test_panic_message() {
        assert_eq!(panic_message(Box::new("boom")), "command panicked: boom");
        assert_eq!(panic_message(Box::new(String::from("bad"))), "command panicked: bad");
        assert_eq!(panic_message(Box::new(7_u8)), "command panicked: unknown panic");
    }

    #[test]
    fn test_cooldown_text_singular() {
        assert_eq!(
            cooldown_text("echo", Duration::from_millis(1_000)),
            "Please wait 1.0 more second before reusing the echo command."
        );
        assert_eq!(
            cooldown_text("echo", Duration::from_millis(1_040)),
            "Please wait 1.0 more second before reusing the echo command."
        );
    }
}
