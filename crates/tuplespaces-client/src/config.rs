//! Session configuration.

/// Connection parameters for one client session.
///
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    endpoint: String,
    client_id: i32,
    debug: bool,
}

impl SessionConfig {
    pub fn new(endpoint: impl Into<String>, client_id: i32, debug: bool) -> Self {
        Self {
            endpoint: endpoint.into(),
            client_id,
            debug,
        }
    }

    /// Server endpoint (`host:port` or URI).
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Identifier removals are attributed to.
    pub fn client_id(&self) -> i32 {
        self.client_id
    }

    /// Whether per-call diagnostics are emitted.
    pub fn debug(&self) -> bool {
        self.debug
    }
}
