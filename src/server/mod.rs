//! Server module
//!
//! Handles TCP connections and manages the event loop.
//! This module is responsible for accepting connections and delegating
//! command processing to the dispatcher, one session per connection.

mod session;

use crate::config::ServerConfig;
use crate::dispatch::Dispatcher;
use crate::persistence::{Persistence, PersistenceConfig};
use crate::store::MemoryStore;
use anyhow::{Context, Result};
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::select;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

pub use session::Session;

/// State shared by every session
///
/// Owns the dispatcher (and through it the store) and the persistence layer.
pub struct ServerState {
    dispatcher: Dispatcher,
    persistence: Persistence,
}

impl ServerState {
    /// Open the snapshot directory and load it into a fresh store
    ///
    /// Snapshot problems are logged and never stop the server from starting.
    pub fn open(data_dir: impl AsRef<Path>) -> Self {
        let persistence = Persistence::open(PersistenceConfig::new(data_dir.as_ref()));

        let store = Arc::new(MemoryStore::new());
        persistence.load(&store);

        ServerState {
            dispatcher: Dispatcher::with_store(store),
            persistence,
        }
    }

    /// The command dispatcher
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// The store
    pub fn store(&self) -> &MemoryStore {
        self.dispatcher.store()
    }

    /// Save a snapshot of the store (blocking file I/O)
    pub fn persist(&self) {
        self.persistence.save(self.store());
    }
}

/// The key-value server
///
/// Accepts every connection, but at most `max_clients` sessions process
/// commands at the same time; the others wait for a free worker.
pub struct Server {
    listener: TcpListener,
    state: Arc<ServerState>,
    workers: Arc<Semaphore>,
}

impl Server {
    /// Load the snapshots and bind the listener
    ///
    /// Only a failure to bind is fatal.
    pub async fn bind(config: &ServerConfig) -> Result<Self> {
        let state = ServerState::open(&config.data_dir);

        let addr = config.address();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;

        Ok(Server {
            listener,
            state: Arc::new(state),
            workers: Arc::new(Semaphore::new(config.max_clients)),
        })
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Shared state (store, dispatcher, persistence)
    pub fn state(&self) -> &Arc<ServerState> {
        &self.state
    }

    /// Accept connections until `shutdown` completes
    ///
    /// Sessions still running at shutdown are not drained.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        let Server {
            listener,
            state,
            workers,
        } = self;
        tokio::pin!(shutdown);

        info!("FerrumKV server listening on {}", listener.local_addr()?);

        loop {
            select! {
                _ = &mut shutdown => {
                    info!("Server shutting down");
                    break;
                }
                accepted = listener.accept() => match accepted {
                    Ok((socket, addr)) => spawn_session(socket, addr, &state, &workers),
                    // Accept failures (e.g. out of file descriptors) only affect that connection
                    Err(e) => error!("Failed to accept connection: {}", e),
                },
            }
        }

        let final_state = state.clone();
        if let Err(e) = tokio::task::spawn_blocking(move || final_state.persist()).await {
            error!("Final snapshot task failed: {}", e);
        }

        Ok(())
    }

    /// Accept connections until Ctrl-C
    pub async fn run_until_ctrl_c(self) -> Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to install Ctrl-C handler: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }
}

/// Start a session task; it waits for a worker before serving commands
fn spawn_session(
    socket: TcpStream,
    addr: SocketAddr,
    state: &Arc<ServerState>,
    workers: &Arc<Semaphore>,
) {
    info!("New connection from {}", addr);

    let state = state.clone();
    let workers = workers.clone();

    tokio::spawn(async move {
        if workers.available_permits() == 0 {
            debug!("All workers busy, {} is queued", addr);
        }

        let _permit = match workers.acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => return,
        };

        let mut session = Session::new(socket, state);
        if let Err(e) = session.run().await {
            warn!("Connection error from {}: {}", addr, e);
        }

        info!("Connection closed: {}", addr);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    fn test_config(dir: &Path, max_clients: usize) -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_clients,
            data_dir: dir.to_path_buf(),
        }
    }

    #[tokio::test]
    async fn test_queued_connection_waits_for_worker() {
        let dir = tempfile::tempdir().unwrap();
        let server = Server::bind(&test_config(dir.path(), 1)).await.unwrap();
        let addr = server.local_addr().unwrap();
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(server.run_until(async {
            let _ = stop_rx.await;
        }));

        let first = TcpStream::connect(addr).await.unwrap();
        let (first_read, mut first_write) = first.into_split();
        let mut first_lines = BufReader::new(first_read).lines();
        first_write.write_all(b"ping\n").await.unwrap();
        assert_eq!(first_lines.next_line().await.unwrap().unwrap(), "pong");

        // The only worker is taken, so the second client is accepted but not served
        let second = TcpStream::connect(addr).await.unwrap();
        let (second_read, mut second_write) = second.into_split();
        let mut second_lines = BufReader::new(second_read).lines();
        second_write.write_all(b"ping\n").await.unwrap();
        let waited = tokio::time::timeout(
            std::time::Duration::from_millis(200),
            second_lines.next_line(),
        )
        .await;
        assert!(waited.is_err());

        // Closing the first client frees the worker
        drop(first_write);
        drop(first_lines);
        assert_eq!(second_lines.next_line().await.unwrap().unwrap(), "pong");

        let _ = stop_tx.send(());
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_unusable_data_dir_still_serves() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("data");
        std::fs::write(&file, b"not a directory").unwrap();

        let server = Server::bind(&test_config(&file, 4)).await.unwrap();
        let addr = server.local_addr().unwrap();
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(server.run_until(async {
            let _ = stop_rx.await;
        }));

        let client = TcpStream::connect(addr).await.unwrap();
        let (read, mut write) = client.into_split();
        let mut lines = BufReader::new(read).lines();

        write.write_all(b"ping\nset k v\nget k\n").await.unwrap();
        assert_eq!(lines.next_line().await.unwrap().unwrap(), "pong");
        assert_eq!(lines.next_line().await.unwrap().unwrap(), "OK");
        assert_eq!(lines.next_line().await.unwrap().unwrap(), "v");

        let _ = stop_tx.send(());
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut config = test_config(dir.path(), 4);
        config.port = taken.local_addr().unwrap().port();

        let err = Server::bind(&config).await.err().unwrap();
        assert!(format!("{:#}", err).contains("failed to bind"));
    }
}
