//! Command execution module
//!
//! Provides a unified interface for all commands through the Command trait.
//! Commands are grouped by the namespace they touch.

mod context;
mod registry;

// Command implementations
mod string;
mod list;
mod admin;
mod help;

pub use context::CommandContext;
pub use registry::CommandRegistry;
pub use help::{command_help, HELP_OVERVIEW};

use crate::protocol::Reply;
use bytes::Bytes;

/// Command execution trait
///
/// All commands implement this trait with a single execute method.
/// This provides loose coupling between command implementations and the dispatcher.
pub trait Command: Send + Sync {
    /// Execute the command with the given context and arguments
    ///
    /// Arguments:
    /// - ctx: the command context (contains the store)
    /// - args: command arguments (excluding the command name itself),
    ///   already checked against `min_args`/`max_args`
    ///
    /// Returns:
    /// - Reply to send to the client
    fn execute(&self, ctx: &CommandContext, args: &[&str]) -> Reply;

    /// Get the command name, upper case
    fn name(&self) -> &'static str;

    /// Get the minimum number of arguments required
    fn min_args(&self) -> usize {
        0
    }

    /// Get the maximum number of arguments (None = unlimited)
    fn max_args(&self) -> Option<usize> {
        None
    }

    /// Whether running this command may change the store
    ///
    /// The session saves a snapshot after every mutating command.
    fn is_mutating(&self) -> bool {
        false
    }
}

/// Copy an argument into a key or value
pub(crate) fn to_bytes(arg: &str) -> Bytes {
    Bytes::copy_from_slice(arg.as_bytes())
}
