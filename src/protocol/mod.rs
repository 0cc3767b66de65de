//! Line protocol implementation
//!
//! Requests are single text lines, responses are one or more text lines.
//! This module only knows about bytes and `Reply` values; it is independent
//! from the commands and the dispatcher (loose coupling).

mod line;
mod types;

pub use line::{LineReader, ReplyEncoder, MAX_LINE_LENGTH};
pub use types::{ProtocolError, Reply};
