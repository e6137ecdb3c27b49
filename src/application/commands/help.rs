//! `help` command - lists commands or describes one

use async_trait::async_trait;

use crate::application::errors::CommandError;
use crate::application::messaging::CommandContext;
use crate::domain::entities::{Command, CommandExecutor};

pub struct HelpCommand;

#[async_trait]
impl CommandExecutor for HelpCommand {
    async fn execute(&self, ctx: CommandContext<'_>) -> Result<(), CommandError> {
        let Some(name) = ctx.arg(0) else {
            return ctx.send(&command_list(&ctx)).await;
        };

        match ctx.registry.resolve(name) {
            Some(cmd) => ctx.send(&command_details(&ctx, cmd)).await,
            None => ctx.reply("that's not a valid command!").await,
        }
    }
}

fn command_list(ctx: &CommandContext<'_>) -> String {
    let names: Vec<&str> = ctx.registry.all().map(|c| c.name.as_str()).collect();
    format!(
        "Here's a list of all my commands:\n{}\n\nYou can send `{}help [command name]` to get info on a specific command!",
        names.join(", "),
        ctx.prefix
    )
}

fn command_details(ctx: &CommandContext<'_>, cmd: &Command) -> String {
    let mut lines = vec![format!("**Name:** {}", cmd.name)];

    if !cmd.aliases.is_empty() {
        lines.push(format!("**Aliases:** {}", cmd.aliases.join(", ")));
    }
    if let Some(description) = &cmd.description {
        lines.push(format!("**Description:** {}", description));
    }
    if let Some(usage) = &cmd.usage {
        lines.push(format!("**Usage:** {}{} {}", ctx.prefix, cmd.name, usage));
    }
    if cmd.guild_only {
        lines.push("**Server only:** yes".to_string());
    }

    let secs = cmd.cooldown_or(ctx.default_cooldown).as_secs();
    lines.push(format!(
        "**Cooldown:** {} second{}",
        secs,
        if secs == 1 { "" } else { "s" }
    ));

    lines.join("\n")
}
