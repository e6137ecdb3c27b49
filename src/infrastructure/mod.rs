//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration and secrets loading
//! - Logging: Subscriber setup
//! - Adapters: Platform integrations (Discord, console)

pub mod config;
pub mod logging;
pub mod adapters;
