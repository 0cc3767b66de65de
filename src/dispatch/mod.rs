//! Command dispatcher
//!
//! Routes request lines to the appropriate handler.
//! This module provides loose coupling between the server and command implementations.

use crate::commands::{CommandContext, CommandRegistry};
use crate::protocol::Reply;
use crate::store::MemoryStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of dispatching one request line
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched {
    /// Reply to send back
    pub reply: Reply,

    /// True when a mutating command ran (arity passed), so a save is due
    pub mutating: bool,
}

impl Dispatched {
    fn rejected(reply: Reply) -> Self {
        Dispatched {
            reply,
            mutating: false,
        }
    }
}

/// Command dispatcher
///
/// Receives request lines, validates them, and routes to appropriate handlers.
/// Holds no per-session state, so one dispatcher serves every connection.
pub struct Dispatcher {
    /// Command registry
    registry: CommandRegistry,

    /// Command execution context
    context: CommandContext,
}

impl Dispatcher {
    /// Create a dispatcher over a fresh store
    pub fn new() -> Self {
        Self::with_context(CommandContext::new())
    }

    /// Create a dispatcher over an existing store
    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        Self::with_context(CommandContext::with_store(store))
    }

    fn with_context(context: CommandContext) -> Self {
        Dispatcher {
            registry: CommandRegistry::new(),
            context,
        }
    }

    /// Dispatch a request line
    ///
    /// Splits the line on whitespace, looks up the first token as the
    /// command name and passes the remaining tokens as arguments.
    pub fn dispatch(&self, line: &str) -> Dispatched {
        let mut tokens = line.split_whitespace();

        // First token is the command name
        let cmd_name = match tokens.next() {
            Some(name) => name,
            None => return Dispatched::rejected(Reply::error("Empty command")),
        };
        let args: Vec<&str> = tokens.collect();

        debug!("Dispatching command: {} ({} args)", cmd_name, args.len());

        // Look up the command
        let command = match self.registry.get(cmd_name) {
            Some(cmd) => cmd,
            None => {
                warn!("Unknown command: {}", cmd_name);
                return Dispatched::rejected(Reply::error("Unknown command"));
            }
        };

        // Validate argument count
        let too_few = args.len() < command.min_args();
        let too_many = command.max_args().is_some_and(|max| args.len() > max);
        if too_few || too_many {
            return Dispatched::rejected(Reply::error(format!(
                "Invalid number of arguments for {}",
                command.name()
            )));
        }

        // Execute the command
        Dispatched {
            reply: command.execute(&self.context, &args),
            mutating: command.is_mutating(),
        }
    }

    /// The store commands run against
    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.context.store
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
