//! Diagnostic logging on stderr.
//!
//! stdout carries command results only, so every subscriber built here
//! writes to stderr (or to a caller-supplied writer in tests).

use std::io::{self, IsTerminal};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Environment variable that overrides the filter directive.
pub const LOG_ENV: &str = "TUPLESPACES_LOG";

const DEBUG_FILTER: &str = "tuplespaces=debug,tuplespaces_client=debug,warn";
const QUIET_FILTER: &str = "warn";

/// Filter directive for a session.
pub fn filter_directive(debug: bool, env_override: Option<&str>) -> String {
    match env_override {
        Some(directive) if !directive.trim().is_empty() => directive.to_string(),
        _ if debug => DEBUG_FILTER.to_string(),
        _ => QUIET_FILTER.to_string(),
    }
}

/// Build the fmt subscriber used by the binary.
pub fn subscriber<W>(
    debug: bool,
    env_override: Option<&str>,
    writer: W,
    ansi: bool,
) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter_directive(debug, env_override)))
        .with_target(false)
        .without_time()
        .with_ansi(ansi)
        .with_writer(writer)
        .finish()
}

/// Install the global subscriber for this process.
pub fn init(debug: bool) {
    let env_override = std::env::var(LOG_ENV).ok();
    let ansi = io::stderr().is_terminal();
    let subscriber = subscriber(debug, env_override.as_deref(), io::stderr, ansi);
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: diagnostics already initialized");
    }
}
