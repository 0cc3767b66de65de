//! FerrumKV - A small in-memory key-value server
//!
//! FerrumKV keeps two independent namespaces, strings and lists, and serves
//! them over a line-oriented text protocol. The whole keyspace is snapshotted
//! to disk after every write.
//!
//! Designed with strong cohesion and loose coupling principles:
//! - Each module has a single, well-defined responsibility
//! - Modules communicate through clear, minimal interfaces
//! - No circular dependencies between modules

pub mod config;
pub mod protocol;
pub mod store;
pub mod commands;
pub mod dispatch;
pub mod persistence;
pub mod server;

/// Re-export commonly used types
pub use config::ServerConfig;
pub use store::{MemoryStore, Snapshot};
pub use protocol::{Reply, ProtocolError};
pub use commands::{Command, CommandContext};
pub use dispatch::Dispatcher;
pub use persistence::{Persistence, PersistenceError};
pub use server::{Server, ServerState};
