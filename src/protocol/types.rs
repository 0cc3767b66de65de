//! Protocol value types

use crate::store::RangeItem;
use bytes::Bytes;
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

/// A response to a single request
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Success marker: OK
    Ok,

    /// Absent value marker: (nil)
    Nil,

    /// Integer, also used for 1/0 booleans
    Integer(i64),

    /// A stored value, sent as-is
    Value(Bytes),

    /// List window, one `<position>) <value>` line per element
    Range(Vec<RangeItem>),

    /// Fixed text (pong, help), may span several lines
    Text(Cow<'static, str>),

    /// Error line: Error: <message>
    Error(String),
}

impl Reply {
    /// Create an error reply
    pub fn error(message: impl Into<String>) -> Self {
        Reply::Error(message.into())
    }

    /// Create a text reply
    pub fn text(text: impl Into<Cow<'static, str>>) -> Self {
        Reply::Text(text.into())
    }

    /// 1 for true, 0 for false
    pub fn boolean(b: bool) -> Self {
        Reply::Integer(b as i64)
    }

    /// Value if present, nil otherwise
    pub fn from_option(value: Option<Bytes>) -> Self {
        value.map(Reply::Value).unwrap_or(Reply::Nil)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok => write!(f, "Ok"),
            Reply::Nil => write!(f, "Nil"),
            Reply::Integer(i) => write!(f, "Integer({})", i),
            Reply::Value(b) => write!(f, "Value({} bytes)", b.len()),
            Reply::Range(items) => write!(f, "Range({} elements)", items.len()),
            Reply::Text(t) => write!(f, "Text({} lines)", t.lines().count()),
            Reply::Error(e) => write!(f, "Error({})", e),
        }
    }
}

/// Framing errors on the request stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// A request line exceeded the length limit
    #[error("Request line too long")]
    LineTooLong,

    /// A request line was not valid UTF-8
    #[error("Invalid request encoding")]
    InvalidEncoding,
}

impl From<ProtocolError> for Reply {
    fn from(err: ProtocolError) -> Self {
        Reply::error(err.to_string())
    }
}
