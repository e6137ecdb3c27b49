//! Message parser - Turns prefixed message content into command invocations

use once_cell::sync::Lazy;
use regex_lite::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static pattern"));

/// A parsed command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Lower-cased command name
    pub name: String,
    /// Positional arguments, never empty strings
    pub args: Vec<String>,
}

/// Parses message content that starts with the command prefix
pub struct MessageParser {
    command_prefix: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.command_prefix
    }

    /// Parse content into an invocation, or `None` if it lacks the prefix.
    ///
    /// Whitespace directly after the prefix produces an empty name.
    pub fn parse(&self, content: &str) -> Option<Invocation> {
        let rest = content.strip_prefix(self.command_prefix.as_str())?;
        let mut tokens = WHITESPACE.split(rest.trim_end());

        let name = tokens.next().unwrap_or_default().to_lowercase();
        let args = tokens
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        Some(Invocation { name, args })
    }
}
