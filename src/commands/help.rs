//! Static help texts

/// Listing shown by a bare HELP
pub const HELP_OVERVIEW: &str = "Available commands:\n\
SET key value - Store key-value pair\n\
GET key - Get value for key\n\
DEL key - Delete key\n\
LPUSH key value - Add value to left of list\n\
RPUSH key value - Add value to right of list\n\
RANGE key start end - Get range of list values\n\
LEN key - Get length of list\n\
LPOP key - Remove and get leftmost value\n\
RPOP key - Remove and get rightmost value\n\
LDEL key - Delete entire list\n\
PING - Check server status\n\
HELP - Show this message\n\
HELP command - Show help for specific command";

/// Per-command help: (name, syntax, description)
const COMMAND_HELP: &[(&str, &str, &str)] = &[
    ("SET", "SET key value", "Store a key-value pair in the string store"),
    ("GET", "GET key", "Retrieve the value associated with a key"),
    ("DEL", "DEL key", "Delete a key-value pair from the string store"),
    ("LPUSH", "LPUSH key value", "Add a value to the left end of a list"),
    ("RPUSH", "RPUSH key value", "Add a value to the right end of a list"),
    ("RANGE", "RANGE key start end", "Get a range of values from a list (0-based indices)"),
    ("LEN", "LEN key", "Get the length of a list"),
    ("LPOP", "LPOP key", "Remove and get the leftmost value from a list"),
    ("RPOP", "RPOP key", "Remove and get the rightmost value from a list"),
    ("LDEL", "LDEL key", "Delete an entire list"),
    ("PING", "PING", "Check if the server is responding"),
    ("HELP", "HELP [command]", "List all commands, or describe one command"),
];

/// Two-line help for one command (case-insensitive), None if unknown
pub fn command_help(name: &str) -> Option<String> {
    COMMAND_HELP
        .iter()
        .find(|(n, _, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, syntax, description)| format!("{}\n{}", syntax, description))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_help() {
        assert_eq!(
            command_help("lpush").unwrap(),
            "LPUSH key value\nAdd a value to the left end of a list"
        );
        assert!(command_help("flushall").is_none());
    }

    #[test]
    fn test_overview_lists_every_command() {
        for (name, _, _) in COMMAND_HELP {
            assert!(HELP_OVERVIEW.contains(name), "{} missing from overview", name);
        }
    }
}
