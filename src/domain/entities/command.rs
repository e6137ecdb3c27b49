use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::application::errors::CommandError;
use crate::application::messaging::CommandContext;

/// Execution entry point of a command
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, ctx: CommandContext<'_>) -> Result<(), CommandError>;
}

/// Synchronous handler: the returned text, if any, is sent to the origin channel
pub type HandlerFn =
    dyn Fn(&CommandContext<'_>) -> Result<Option<String>, CommandError> + Send + Sync;

struct FnExecutor(Box<HandlerFn>);

#[async_trait]
impl CommandExecutor for FnExecutor {
    async fn execute(&self, ctx: CommandContext<'_>) -> Result<(), CommandError> {
        if let Some(text) = (self.0)(&ctx)? {
            ctx.send(&text).await?;
        }
        Ok(())
    }
}

/// Represents a bot command
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub aliases: Vec<String>,
    pub usage: Option<String>,
    pub guild_only: bool,
    pub requires_args: bool,
    pub cooldown: Option<Duration>,
    executor: Option<Arc<dyn CommandExecutor>>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_lowercase(),
            description: None,
            aliases: Vec::new(),
            usage: None,
            guild_only: false,
            requires_args: false,
            cooldown: None,
            executor: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(|a| a.into().to_lowercase()).collect();
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn guild_only(mut self) -> Self {
        self.guild_only = true;
        self
    }

    pub fn requires_args(mut self) -> Self {
        self.requires_args = true;
        self
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = Some(cooldown);
        self
    }

    pub fn with_executor<E: CommandExecutor + 'static>(mut self, executor: E) -> Self {
        self.executor = Some(Arc::new(executor));
        self
    }

    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&CommandContext<'_>) -> Result<Option<String>, CommandError> + Send + Sync + 'static,
    {
        self.executor = Some(Arc::new(FnExecutor(Box::new(handler))));
        self
    }

    pub fn executor(&self) -> Option<&Arc<dyn CommandExecutor>> {
        self.executor.as_ref()
    }

    pub fn has_alias(&self, input: &str) -> bool {
        let input_lower = input.to_lowercase();
        self.aliases.iter().any(|a| *a == input_lower)
    }

    /// Effective cooldown given the configured default
    pub fn cooldown_or(&self, default: Duration) -> Duration {
        self.cooldown.unwrap_or(default)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("usage", &self.usage)
            .field("guild_only", &self.guild_only)
            .field("requires_args", &self.requires_args)
            .field("cooldown", &self.cooldown)
            .field("has_executor", &self.executor.is_some())
            .finish()
    }
}

/// Command registry, iterated in registration order
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_commands(commands: impl IntoIterator<Item = Command>) -> Self {
        let mut registry = Self::new();
        for command in commands {
            registry.register(command);
        }
        registry
    }

    /// Register a command. A duplicate name replaces the earlier command but keeps its slot.
    pub fn register(&mut self, command: Command) {
        match self.index.get(&command.name) {
            Some(&slot) => {
                tracing::warn!("Command '{}' registered twice, replacing the earlier definition", command.name);
                self.commands[slot] = command;
            }
            None => {
                self.index.insert(command.name.clone(), self.commands.len());
                self.commands.push(command);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.index
            .get(&name.to_lowercase())
            .map(|&slot| &self.commands[slot])
    }

    pub fn find_by_alias(&self, alias: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.has_alias(alias))
    }

    /// Name match first, then the first alias match
    pub fn resolve(&self, input: &str) -> Option<&Command> {
        self.get(input).or_else(|| self.find_by_alias(input))
    }

    pub fn all(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Command {
        Command::new(name).with_description(format!("{} command", name))
    }

    #[test]
    fn test_name_lookup_is_case_insensitive() {
        let registry = CommandRegistry::from_commands([named("Ping")]);

        assert_eq!(registry.get("ping").map(|c| c.name.as_str()), Some("ping"));
        assert_eq!(registry.get("PING").map(|c| c.name.as_str()), Some("ping"));
        assert!(registry.get("pong").is_none());
    }

    #[test]
    fn test_name_takes_precedence_over_alias() {
        let registry = CommandRegistry::from_commands([
            named("info").with_aliases(["stats"]),
            named("stats"),
        ]);

        let cmd = registry.resolve("stats").expect("should resolve");
        assert_eq!(cmd.name, "stats");
    }

    #[test]
    fn test_alias_collision_uses_registration_order() {
        let registry = CommandRegistry::from_commands([
            named("first").with_aliases(["x"]),
            named("second").with_aliases(["x"]),
        ]);

        assert_eq!(registry.find_by_alias("X").map(|c| c.name.as_str()), Some("first"));
    }

    #[test]
    fn test_duplicate_name_replaces_in_place() {
        let registry = CommandRegistry::from_commands([
            named("a"),
            named("b"),
            named("a").with_usage("<new>"),
        ]);

        assert_eq!(registry.len(), 2);
        let names: Vec<&str> = registry.all().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(registry.get("a").and_then(|c| c.usage.as_deref()), Some("<new>"));
    }

    #[test]
    fn test_cooldown_or_default() {
        let default = Duration::from_secs(5);
        assert_eq!(named("a").cooldown_or(default), default);
        assert_eq!(
            named("a").with_cooldown(Duration::from_secs(2)).cooldown_or(default),
            Duration::from_secs(2)
        );
    }
}
