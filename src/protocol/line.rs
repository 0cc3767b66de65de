//! Line framing and reply encoding
//!
//! Requests: one command per line, terminated by `\n` (a trailing `\r` is
//! dropped). Replies: every line is terminated by `\n`.

use super::types::{ProtocolError, Reply};
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Longest accepted request line, terminator excluded
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Splits a byte stream into request lines
///
/// After an over-long line the reader skips everything up to the next
/// newline, so the tail of that line is never taken for a new request.
#[derive(Debug)]
pub struct LineReader {
    max_length: usize,
    discarding: bool,
}

impl LineReader {
    /// Create a reader with the default length limit
    pub fn new() -> Self {
        Self::with_max_length(MAX_LINE_LENGTH)
    }

    /// Create a reader with a custom length limit
    pub fn with_max_length(max_length: usize) -> Self {
        LineReader {
            max_length,
            discarding: false,
        }
    }

    /// Take the next complete line out of the buffer
    ///
    /// Returns Ok(Some(line)) if a complete line was read,
    /// Ok(None) if more data is needed,
    /// Err(e) if the line has to be rejected
    pub fn next_line(&mut self, buf: &mut BytesMut) -> Result<Option<String>, ProtocolError> {
        loop {
            let newline = buf.iter().position(|b| *b == b'\n');

            if self.discarding {
                match newline {
                    Some(i) => {
                        buf.advance(i + 1);
                        self.discarding = false;
                        continue;
                    }
                    None => {
                        buf.clear();
                        return Ok(None);
                    }
                }
            }

            return match newline {
                Some(i) if i > self.max_length => {
                    buf.advance(i + 1);
                    Err(ProtocolError::LineTooLong)
                }
                Some(i) => {
                    let mut line = buf.split_to(i + 1);
                    line.truncate(i);
                    if line.last() == Some(&b'\r') {
                        line.truncate(i - 1);
                    }
                    String::from_utf8(line.to_vec())
                        .map(Some)
                        .map_err(|_| ProtocolError::InvalidEncoding)
                }
                None if buf.len() > self.max_length => {
                    buf.clear();
                    self.discarding = true;
                    Err(ProtocolError::LineTooLong)
                }
                None => Ok(None),
            };
        }
    }
}

impl Default for LineReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Reply encoder
pub struct ReplyEncoder;

impl ReplyEncoder {
    /// Encode a reply to bytes
    pub fn encode(reply: &Reply) -> Bytes {
        let mut buf = BytesMut::new();
        Self::encode_to(&mut buf, reply);
        buf.freeze()
    }

    /// Encode a reply into an existing buffer
    pub fn encode_to(buf: &mut BytesMut, reply: &Reply) {
        match reply {
            Reply::Ok => buf.put_slice(b"OK\n"),
            Reply::Nil => buf.put_slice(b"(nil)\n"),
            Reply::Integer(i) => {
                buf.put_slice(i.to_string().as_bytes());
                buf.put_u8(b'\n');
            }
            Reply::Value(value) => {
                buf.put_slice(value);
                buf.put_u8(b'\n');
            }
            Reply::Range(items) => {
                for item in items {
                    buf.put_slice(item.position.to_string().as_bytes());
                    buf.put_slice(b") ");
                    buf.put_slice(&item.value);
                    buf.put_u8(b'\n');
                }
            }
            Reply::Text(text) => {
                buf.put_slice(text.as_bytes());
                buf.put_u8(b'\n');
            }
            Reply::Error(message) => {
                buf.put_slice(b"Error: ");
                buf.put_slice(message.as_bytes());
                buf.put_u8(b'\n');
            }
        }
    }
}
