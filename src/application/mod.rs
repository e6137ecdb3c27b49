//! Application layer - Use cases
//!
//! This layer contains:
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing, cooldowns, dispatching
//! - Commands: Built-in command set

pub mod commands;
pub mod errors;
pub mod messaging;
