//! Built-in commands
//!
//! Commands are registered from this static list; the registry keeps the
//! order given here, which also decides alias collisions.

pub mod help;

use std::time::Duration;

use crate::domain::entities::{Command, CommandRegistry};
use help::HelpCommand;

/// All built-in commands, in registration order
pub fn builtin() -> Vec<Command> {
    vec![
        Command::new("ping")
            .with_description("Check that the bot is alive")
            .with_handler(|_ctx| Ok(Some("Pong.".to_string()))),
        Command::new("help")
            .with_description("List all commands or info about a specific command")
            .with_aliases(["commands"])
            .with_usage("[command name]")
            .with_executor(HelpCommand),
        Command::new("server")
            .with_description("Show information about this server")
            .guild_only()
            .with_handler(|ctx| {
                let guild = ctx.message.guild_id.as_deref().unwrap_or("unknown");
                Ok(Some(format!(
                    "Server id: {}\nChannel id: {}",
                    guild, ctx.message.channel_id
                )))
            }),
        Command::new("user-info")
            .with_description("Show information about yourself")
            .with_aliases(["whoami"])
            .with_handler(|ctx| {
                let author = &ctx.message.author;
                Ok(Some(format!(
                    "Your username: {}\nYour ID: {}",
                    author.display_name(),
                    author.id
                )))
            }),
        Command::new("echo")
            .with_description("Repeat the given text")
            .with_usage("<text...>")
            .requires_args()
            .with_cooldown(Duration::from_secs(3))
            .with_handler(|ctx| Ok(Some(ctx.args.join(" ")))),
    ]
}

/// Registry holding the built-in commands
pub fn builtin_registry() -> CommandRegistry {
    let registry = CommandRegistry::from_commands(builtin());
    tracing::info!("Registered {} commands", registry.len());
    registry
}
