//! Interactive FerrumKV client
//!
//! Sends each line typed by the operator and prints the reply. Type `exit`
//! to quit.

use anyhow::{Context, Result};
use clap::Parser;
use ferrumkv::config::{ServerConfig, DEFAULT_CONFIG_FILE};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Extra lines of a multi-line reply arrive right behind the first one
const CONTINUATION_WINDOW: Duration = Duration::from_millis(50);

/// FerrumKV command-line client
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Properties file to read server.port from
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Server host
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Override the configured port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let port = match args.port {
        Some(port) => port,
        None => ServerConfig::load(&args.config)?.port,
    };

    let addr = format!("{}:{}", args.host, port);
    let stream = TcpStream::connect(&addr)
        .await
        .with_context(|| format!("failed to connect to {}", addr))?;
    let (reader, mut writer) = stream.into_split();
    let mut replies = BufReader::new(reader).lines();
    let mut input = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    println!("Connected to server. Type 'exit' to quit.");
    println!("Type 'help' to see available commands.");

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let command = match input.next_line().await? {
            Some(line) => line.trim().to_string(),
            None => break,
        };
        if command.eq_ignore_ascii_case("exit") {
            break;
        }

        writer.write_all(command.as_bytes()).await?;
        writer.write_all(b"\n").await?;

        match replies.next_line().await? {
            Some(line) => println!("{}", line),
            None => anyhow::bail!("server closed the connection"),
        }

        while let Ok(Ok(Some(line))) = timeout(CONTINUATION_WINDOW, replies.next_line()).await {
            println!("{}", line);
        }
    }

    Ok(())
}
