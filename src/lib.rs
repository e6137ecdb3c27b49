//! herald-bot - a prefix-command chat bot
//!
//! Messages from a gateway adapter go through the [`MessageDispatcher`],
//! which resolves a command from the [`CommandRegistry`], applies the
//! guild-only, argument and cooldown gates, and runs the command.
//!
//! [`MessageDispatcher`]: application::messaging::MessageDispatcher
//! [`CommandRegistry`]: domain::entities::CommandRegistry

pub mod domain;
pub mod application;
pub mod infrastructure;
