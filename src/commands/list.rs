//! List commands (LPUSH, RPUSH, RANGE, LEN, LPOP, RPOP, LDEL)

use super::{to_bytes, Command, CommandContext};
use crate::protocol::Reply;

/// LPUSH command - Prepend a value to a list
///
/// Syntax: LPUSH key value
pub struct LPushCommand;

impl Command for LPushCommand {
    fn execute(&self, ctx: &CommandContext, args: &[&str]) -> Reply {
        ctx.store.lpush(to_bytes(args[0]), to_bytes(args[1]));
        Reply::Ok
    }

    fn name(&self) -> &'static str {
        "LPUSH"
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

/// RPUSH command - Append a value to a list
///
/// Syntax: RPUSH key value
pub struct RPushCommand;

impl Command for RPushCommand {
    fn execute(&self, ctx: &CommandContext, args: &[&str]) -> Reply {
        ctx.store.rpush(to_bytes(args[0]), to_bytes(args[1]));
        Reply::Ok
    }

    fn name(&self) -> &'static str {
        "RPUSH"
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

/// RANGE command - Get a range of elements from a list
///
/// Syntax: RANGE key start end
pub struct RangeCommand;

impl Command for RangeCommand {
    fn execute(&self, ctx: &CommandContext, args: &[&str]) -> Reply {
        let (start, end) = match (args[1].parse::<i64>(), args[2].parse::<i64>()) {
            (Ok(start), Ok(end)) => (start, end),
            _ => return Reply::error("Invalid range parameters"),
        };

        match ctx.store.range(args[0].as_bytes(), start, end) {
            Some(items) => Reply::Range(items),
            None => Reply::Nil,
        }
    }

    fn name(&self) -> &'static str {
        "RANGE"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

/// LEN command - Get the length of a list
///
/// Syntax: LEN key
pub struct LenCommand;

impl Command for LenCommand {
    fn execute(&self, ctx: &CommandContext, args: &[&str]) -> Reply {
        Reply::Integer(ctx.store.len(args[0].as_bytes()) as i64)
    }

    fn name(&self) -> &'static str {
        "LEN"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// LPOP command - Remove and return the first element of a list
///
/// Syntax: LPOP key
pub struct LPopCommand;

impl Command for LPopCommand {
    fn execute(&self, ctx: &CommandContext, args: &[&str]) -> Reply {
        Reply::from_option(ctx.store.lpop(args[0].as_bytes()))
    }

    fn name(&self) -> &'static str {
        "LPOP"
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

/// RPOP command - Remove and return the last element of a list
///
/// Syntax: RPOP key
pub struct RPopCommand;

impl Command for RPopCommand {
    fn execute(&self, ctx: &CommandContext, args: &[&str]) -> Reply {
        Reply::from_option(ctx.store.rpop(args[0].as_bytes()))
    }

    fn name(&self) -> &'static str {
        "RPOP"
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

/// LDEL command - Delete a whole list
///
/// Syntax: LDEL key
pub struct LDelCommand;

impl Command for LDelCommand {
    fn execute(&self, ctx: &CommandContext, args: &[&str]) -> Reply {
        Reply::boolean(ctx.store.ldel(args[0].as_bytes()))
    }

    fn name(&self) -> &'static str {
        "LDEL"
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
    use crate::store::RangeItem;
    use bytes::Bytes;

    fn item(position: usize, value: &'static str) -> RangeItem {
        RangeItem {
            position,
            value: Bytes::from(value),
        }
    }

    #[test]
    fn test_lpush_rpush() {
        let ctx = CommandContext::new();

        assert_eq!(RPushCommand.execute(&ctx, &["mylist", "a"]), Reply::Ok);
        assert_eq!(RPushCommand.execute(&ctx, &["mylist", "b"]), Reply::Ok);
        assert_eq!(LPushCommand.execute(&ctx, &["mylist", "c"]), Reply::Ok);

        // RANGE mylist 0 -1 should return [c, a, b]
        let result = RangeCommand.execute(&ctx, &["mylist", "0", "-1"]);
        let expected = Reply::Range(vec![item(1, "c"), item(2, "a"), item(3, "b")]);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_range() {
        let ctx = CommandContext::new();
        for v in ["a", "b", "c", "d", "e"] {
            RPushCommand.execute(&ctx, &["mylist", v]);
        }

        // RANGE mylist 1 3 should return [b, c, d]
        let result = RangeCommand.execute(&ctx, &["mylist", "1", "3"]);
        assert_eq!(result, Reply::Range(vec![item(1, "b"), item(2, "c"), item(3, "d")]));

        // RANGE mylist -2 -1 should return [d, e]
        let result = RangeCommand.execute(&ctx, &["mylist", "-2", "-1"]);
        assert_eq!(result, Reply::Range(vec![item(1, "d"), item(2, "e")]));

        // Out of bounds and absent keys are nil
        assert_eq!(RangeCommand.execute(&ctx, &["mylist", "5", "9"]), Reply::Nil);
        assert_eq!(RangeCommand.execute(&ctx, &["nolist", "0", "-1"]), Reply::Nil);
    }

    #[test]
    fn test_range_invalid_parameters() {
        let ctx = CommandContext::new();

        let result = RangeCommand.execute(&ctx, &["mylist", "zero", "-1"]);
        assert_eq!(result, Reply::error("Invalid range parameters"));

        let result = RangeCommand.execute(&ctx, &["mylist", "0", "1.5"]);
        assert_eq!(result, Reply::error("Invalid range parameters"));
    }

    #[test]
    fn test_len() {
        let ctx = CommandContext::new();
        for v in ["a", "b", "c"] {
            RPushCommand.execute(&ctx, &["mylist", v]);
        }

        assert_eq!(LenCommand.execute(&ctx, &["mylist"]), Reply::Integer(3));
        assert_eq!(LenCommand.execute(&ctx, &["nonexistent"]), Reply::Integer(0));
    }

    #[test]
    fn test_pops() {
        let ctx = CommandContext::new();
        for v in ["a", "b", "c"] {
            RPushCommand.execute(&ctx, &["mylist", v]);
        }

        assert_eq!(LPopCommand.execute(&ctx, &["mylist"]), Reply::Value(Bytes::from("a")));
        assert_eq!(RPopCommand.execute(&ctx, &["mylist"]), Reply::Value(Bytes::from("c")));
        assert_eq!(RPopCommand.execute(&ctx, &["mylist"]), Reply::Value(Bytes::from("b")));
        assert_eq!(RPopCommand.execute(&ctx, &["mylist"]), Reply::Nil);
        assert_eq!(LPopCommand.execute(&ctx, &["mylist"]), Reply::Nil);

        // The emptied list is still there until LDEL
        assert_eq!(LDelCommand.execute(&ctx, &["mylist"]), Reply::Integer(1));
        assert_eq!(LDelCommand.execute(&ctx, &["mylist"]), Reply::Integer(0));
    }

    #[test]
    fn test_pop_absent_key() {
        let ctx = CommandContext::new();

        assert_eq!(LPopCommand.execute(&ctx, &["ghost"]), Reply::Nil);
        assert_eq!(RPopCommand.execute(&ctx, &["ghost"]), Reply::Nil);
        assert!(!ctx.store.contains_list(b"ghost"));
    }
}
