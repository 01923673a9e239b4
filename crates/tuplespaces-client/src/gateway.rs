//! Command gateway over a [`TupleSpaces`] service.
//!
//! Every call is attempted exactly once. Errors never cross this boundary:
//! each operation folds its result into an [`Outcome`]. Diagnostics are
//! emitted as `debug` events, and only for sessions started in debug mode.

use std::fmt;

use tracing::debug;

use crate::client::RpcClient;
use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::service::TupleSpaces;
use crate::types::{GetTupleSpacesStateRequest, PutRequest, ReadRequest, TakeRequest};

/// Result of one remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T = ()> {
    /// The call returned; carries the payload, if the operation has one.
    Success(T),
    /// The call failed; carries the failure detail when one is known.
    Failure(Option<String>),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Detail of a failed call.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(detail) => detail.as_deref(),
        }
    }
}

/// Remote operation kinds, as named in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Put,
    Read,
    Take,
    GetTupleSpacesState,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Put => "PUT",
            Operation::Read => "READ",
            Operation::Take => "TAKE",
            Operation::GetTupleSpacesState => "GET_TUPLE_SPACES_STATE",
        };
        f.write_str(name)
    }
}

/// Owns the connection to the tuple space service.
pub struct Gateway<S: TupleSpaces = RpcClient> {
    config: SessionConfig,
    service: Option<S>,
}

impl Gateway<RpcClient> {
    /// Build the RPC client for the configured endpoint.
    pub fn connect(config: SessionConfig) -> Result<Self> {
        let client = RpcClient::builder().endpoint(config.endpoint()).build()?;
        Ok(Self::new(config, client))
    }
}

impl<S: TupleSpaces> Gateway<S> {
    pub fn new(config: SessionConfig, service: S) -> Self {
        Self {
            config,
            service: Some(service),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.service.is_none()
    }

    /// Store a tuple. No payload on success.
    pub async fn put(&self, tuple: &str) -> Outcome {
        let args = format!("tuple: {}", tuple);
        self.trace_request(Operation::Put, &args);
        let result = match self.service() {
            Ok(service) => service
                .put(PutRequest {
                    new_tuple: tuple.to_string(),
                })
                .await
                .map(|_| ()),
            Err(err) => Err(err),
        };
        self.settle(Operation::Put, &args, result)
    }

    /// Read a tuple matching `pattern`.
    pub async fn read(&self, pattern: &str) -> Outcome<String> {
        let args = format!("pattern: {}", pattern);
        self.trace_request(Operation::Read, &args);
        let result = match self.service() {
            Ok(service) => service
                .read(ReadRequest {
                    search_pattern: pattern.to_string(),
                })
                .await
                .map(|response| response.result),
            Err(err) => Err(err),
        };
        self.settle(Operation::Read, &args, result)
    }

    /// Remove a tuple matching `pattern` on behalf of `client_id`.
    pub async fn take(&self, client_id: i32, pattern: &str) -> Outcome<String> {
        let args = format!("pattern: {}", pattern);
        self.trace_request(Operation::Take, &args);
        let result = match self.service() {
            Ok(service) => service
                .take(TakeRequest {
                    search_pattern: pattern.to_string(),
                    client_id,
                })
                .await
                .map(|response| response.result),
            Err(err) => Err(err),
        };
        self.settle(Operation::Take, &args, result)
    }

    /// Snapshot the tuple space, in whatever order the server reports.
    pub async fn get_state(&self) -> Outcome<Vec<String>> {
        self.trace_request(Operation::GetTupleSpacesState, "");
        let result = match self.service() {
            Ok(service) => service
                .get_tuple_spaces_state(GetTupleSpacesStateRequest {})
                .await
                .map(|response| response.tuple),
            Err(err) => Err(err),
        };
        self.settle(Operation::GetTupleSpacesState, "", result)
    }

    /// Release the connection. Later calls are no-ops.
    pub fn close(&mut self) {
        if let Some(service) = self.service.take() {
            service.shutdown();
            if self.config.debug() {
                debug!(client_id = self.config.client_id(), "connection closed");
            }
        }
    }

    fn service(&self) -> Result<&S> {
        self.service.as_ref().ok_or(Error::Closed)
    }

    fn trace_request(&self, op: Operation, args: &str) {
        if self.config.debug() {
            debug!(
                client_id = self.config.client_id(),
                "sending {} request... {}",
                op,
                args
            );
        }
    }

    fn settle<T>(&self, op: Operation, args: &str, result: Result<T>) -> Outcome<T> {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(err) => {
                let detail = err.detail();
                if self.config.debug() {
                    debug!(
                        client_id = self.config.client_id(),
                        args,
                        "{} request error: {}",
                        op,
                        detail
                    );
                }
                Outcome::Failure(Some(detail))
            }
        }
    }
}

impl<S: TupleSpaces> Drop for Gateway<S> {
    fn drop(&mut self) {
        self.close();
    }
}
