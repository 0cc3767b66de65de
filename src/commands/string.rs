//! String commands (SET, GET, DEL)

use super::{to_bytes, Command, CommandContext};
use crate::protocol::Reply;

/// SET command - Set a key to a value
///
/// Syntax: SET key value
pub struct SetCommand;

impl Command for SetCommand {
    fn execute(&self, ctx: &CommandContext, args: &[&str]) -> Reply {
        ctx.store.set(to_bytes(args[0]), to_bytes(args[1]));
        Reply::Ok
    }

    fn name(&self) -> &'static str {
        "SET"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }

    fn is_mutating(&self) -> bool {
        true
    }
}

/// GET command - Get the value of a key
///
/// Syntax: GET key
pub struct GetCommand;

impl Command for GetCommand {
    fn execute(&self, ctx: &CommandContext, args: &[&str]) -> Reply {
        Reply::from_option(ctx.store.get(args[0].as_bytes()))
    }

    fn name(&self) -> &'static str {
        "GET"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// DEL command - Delete a string key
///
/// Syntax: DEL key
pub struct DelCommand;

impl Command for DelCommand {
    fn execute(&self, ctx: &CommandContext, args: &[&str]) -> Reply {
        Reply::boolean(ctx.store.del(args[0].as_bytes()))
    }

    fn name(&self) -> &'static str {
        "DEL"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }

    fn is_mutating(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_set_get() {
        let ctx = CommandContext::new();

        let result = SetCommand.execute(&ctx, &["mykey", "myvalue"]);
        assert_eq!(result, Reply::Ok);

        let result = GetCommand.execute(&ctx, &["mykey"]);
        assert_eq!(result, Reply::Value(Bytes::from("myvalue")));
    }

    #[test]
    fn test_get_nonexistent() {
        let ctx = CommandContext::new();

        let result = GetCommand.execute(&ctx, &["nonexistent"]);
        assert_eq!(result, Reply::Nil);
    }

    #[test]
    fn test_del() {
        let ctx = CommandContext::new();

        assert_eq!(DelCommand.execute(&ctx, &["mykey"]), Reply::Integer(0));

        SetCommand.execute(&ctx, &["mykey", "myvalue"]);
        assert_eq!(DelCommand.execute(&ctx, &["mykey"]), Reply::Integer(1));
        assert_eq!(GetCommand.execute(&ctx, &["mykey"]), Reply::Nil);
    }
}
