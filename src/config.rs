//! Server configuration
//!
//! Read from a properties file (`key=value` lines, `#` or `!` comments).
//! Every key is optional; a missing file means all defaults.

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Default configuration file
pub const DEFAULT_CONFIG_FILE: &str = "config.properties";

/// Default port
pub const DEFAULT_PORT: u16 = 6379;

/// Default size of the worker pool
pub const DEFAULT_MAX_CLIENTS: usize = 100;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to listen on (`server.host`)
    pub host: String,

    /// Port to listen on (`server.port`)
    pub port: u16,

    /// Sessions processed at the same time (`server.max_clients`)
    pub max_clients: usize,

    /// Directory for snapshot files (`data.dir`)
    pub data_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            max_clients: DEFAULT_MAX_CLIENTS,
            data_dir: PathBuf::from("."),
        }
    }
}

impl ServerConfig {
    /// Load from a properties file, falling back to defaults if it does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No config file at {:?}, using defaults", path);
                return Ok(ServerConfig::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read config file {:?}", path))
            }
        };

        Self::from_properties(&text).with_context(|| format!("invalid config file {:?}", path))
    }

    /// Build a config from properties text
    pub fn from_properties(text: &str) -> Result<Self> {
        let props = parse_properties(text)?;
        let mut config = ServerConfig::default();

        if let Some(host) = props.get("server.host") {
            config.host = host.clone();
        }
        if let Some(port) = parse_value::<u16>(&props, "server.port")? {
            config.port = port;
        }
        if let Some(max_clients) = parse_value::<usize>(&props, "server.max_clients")? {
            if max_clients == 0 {
                bail!("server.max_clients must be at least 1");
            }
            config.max_clients = max_clients;
        }
        if let Some(dir) = props.get("data.dir") {
            config.data_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    /// `host:port` to bind or connect to
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse `key=value` lines into a map
fn parse_properties(text: &str) -> Result<HashMap<String, String>> {
    let mut props = HashMap::new();

    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let (key, value) = line
            .split_once(|c| c == '=' || c == ':')
            .with_context(|| format!("line {}: expected key=value", number + 1))?;
        props.insert(key.trim().to_string(), value.trim().to_string());
    }

    Ok(props)
}

fn parse_value<T>(props: &HashMap<String, String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    props
        .get(key)
        .map(|raw| {
            raw.parse::<T>()
                .with_context(|| format!("invalid value {:?} for {}", raw, key))
        })
        .transpose()
}
