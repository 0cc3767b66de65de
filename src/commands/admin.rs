//! Admin commands (PING, HELP)

use super::{command_help, Command, CommandContext, HELP_OVERVIEW};
use crate::protocol::Reply;

/// PING command - Check that the server answers
///
/// Syntax: PING
pub struct PingCommand;

impl Command for PingCommand {
    fn execute(&self, _ctx: &CommandContext, _args: &[&str]) -> Reply {
        Reply::text("pong")
    }

    fn name(&self) -> &'static str {
        "PING"
    }

    fn max_args(&self) -> Option<usize> {
        Some(0)
    }
}

/// HELP command - List commands or describe one
///
/// Syntax: HELP [command]
pub struct HelpCommand;

impl Command for HelpCommand {
    fn execute(&self, _ctx: &CommandContext, args: &[&str]) -> Reply {
        match args.first() {
            None => Reply::text(HELP_OVERVIEW),
            Some(name) => match command_help(name) {
                Some(text) => Reply::text(text),
                None => Reply::text("Unknown command"),
            },
        }
    }

    fn name(&self) -> &'static str {
        "HELP"
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping() {
        let ctx = CommandContext::new();
        assert_eq!(PingCommand.execute(&ctx, &[]), Reply::text("pong"));
    }

    #[test]
    fn test_help() {
        let ctx = CommandContext::new();

        assert_eq!(HelpCommand.execute(&ctx, &[]), Reply::text(HELP_OVERVIEW));
        assert_eq!(
            HelpCommand.execute(&ctx, &["range"]),
            Reply::text("RANGE key start end\nGet a range of values from a list (0-based indices)")
        );
        assert_eq!(
            HelpCommand.execute(&ctx, &["nope"]),
            Reply::text("Unknown command")
        );
    }
}
