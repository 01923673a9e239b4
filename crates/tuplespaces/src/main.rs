//! Interactive command-line client for a remote tuple space.
//!
//! Usage: `tuplespaces <endpoint> <client_id> [-debug]`

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tuplespaces_client::{Gateway, SessionConfig};

mod commands;
mod input;
mod logging;

use commands::repl::Repl;

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Interactive client for a remote tuple space service
#[derive(Parser, Debug)]
#[command(name = "tuplespaces")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Server endpoint, as host:port or URI
    pub endpoint: String,

    /// Numeric client identifier, used to attribute take operations
    #[arg(allow_negative_numbers = true)]
    pub client_id: i32,

    /// Pass `-debug` to echo requests and failures on stderr
    #[arg(value_name = "DEBUG", allow_hyphen_values = true)]
    pub mode: Option<String>,
}

impl Cli {
    /// Debug mode is on only for the exact `-debug` marker.
    pub fn debug(&self) -> bool {
        self.mode.as_deref() == Some("-debug")
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new(self.endpoint.clone(), self.client_id, self.debug())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.debug());

    if cli.debug() {
        let args: Vec<String> = std::env::args().skip(1).collect();
        debug!("Debug mode enabled");
        debug!("Received {} arguments", args.len());
        for (i, arg) in args.iter().enumerate() {
            debug!("arg[{}] = {}", i, arg);
        }
    }

    let gateway = Gateway::connect(cli.session_config())?;
    let input = input::stdin_source()?;

    Repl::new(gateway, input, io::stdout()).run().await
}
