//! Session handling
//!
//! Manages one client connection: reads request lines, dispatches them,
//! saves a snapshot after mutating commands, and sends the replies back.

use super::ServerState;
use crate::protocol::{LineReader, Reply, ReplyEncoder};
use bytes::BytesMut;
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, warn};

/// Session over any byte stream
///
/// Requests are handled strictly one at a time, in the order received.
pub struct Session<S> {
    /// Client stream
    stream: S,

    /// Shared server state
    state: Arc<ServerState>,

    /// Request framing
    lines: LineReader,

    /// Read buffer
    read_buffer: BytesMut,

    /// Write buffer
    write_buffer: BytesMut,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Create a new session
    pub fn new(stream: S, state: Arc<ServerState>) -> Self {
        Session {
            stream,
            state,
            lines: LineReader::new(),
            read_buffer: BytesMut::with_capacity(4096),
            write_buffer: BytesMut::with_capacity(4096),
        }
    }

    /// Serve the connection until the client closes it
    pub async fn run(&mut self) -> io::Result<()> {
        loop {
            // Read data from the socket
            let n = self.stream.read_buf(&mut self.read_buffer).await?;

            // Connection closed; a last line without newline still counts
            if n == 0 {
                if !self.read_buffer.is_empty() {
                    self.read_buffer.extend_from_slice(b"\n");
                    self.process_buffered().await?;
                }
                return Ok(());
            }

            debug!("Read {} bytes", n);
            self.process_buffered().await?;
        }
    }

    /// Handle every complete line in the read buffer
    async fn process_buffered(&mut self) -> io::Result<()> {
        loop {
            match self.lines.next_line(&mut self.read_buffer) {
                Ok(Some(line)) => {
                    let reply = self.execute(&line).await;
                    debug!("Response: {}", reply);
                    self.send_reply(&reply).await?;
                }
                Ok(None) => return Ok(()),
                Err(e) => {
                    warn!("Protocol error: {}", e);
                    self.send_reply(&Reply::from(e)).await?;
                }
            }
        }
    }

    /// Dispatch one line, saving a snapshot first if it changed the store
    async fn execute(&self, line: &str) -> Reply {
        let outcome = self.state.dispatcher().dispatch(line);

        if outcome.mutating {
            let state = self.state.clone();
            if let Err(e) = tokio::task::spawn_blocking(move || state.persist()).await {
                error!("Snapshot task failed: {}", e);
            }
        }

        outcome.reply
    }

    /// Send a reply to the client
    async fn send_reply(&mut self, reply: &Reply) -> io::Result<()> {
        // Encode the reply
        self.write_buffer.clear();
        ReplyEncoder::encode_to(&mut self.write_buffer, reply);

        // Write to the socket
        self.stream.write_all(&self.write_buffer).await?;
        self.stream.flush().await?;

        Ok(())
    }
}
