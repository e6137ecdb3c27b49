//! Message handling - Event-driven message processing

pub mod context;
pub mod cooldown;
pub mod dispatcher;
pub mod parser;

pub use context::CommandContext;
pub use cooldown::{CooldownStatus, CooldownTracker};
pub use dispatcher::{DispatchOutcome, MessageDispatcher};
pub use parser::{Invocation, MessageParser};
