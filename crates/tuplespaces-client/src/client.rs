//! gRPC implementation of [`TupleSpaces`].

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tonic::transport::{Channel, Endpoint};

use crate::error::{Error, Result};
use crate::service::TupleSpaces;
use crate::types::proto::tuple_spaces_client::TupleSpacesClient;
use crate::types::{
    GetTupleSpacesStateRequest, GetTupleSpacesStateResponse, PutRequest, PutResponse, ReadRequest,
    ReadResponse, TakeRequest, TakeResponse,
};

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Tuple space RPC client.
///
/// Holds one lazily connected gRPC channel for the lifetime of the session.
///
/// # Example
///
/// ```no_run
/// use tuplespaces_client::{RpcClient, TupleSpaces, ReadRequest};
///
/// # async fn example() -> tuplespaces_client::Result<()> {
/// let client = RpcClient::builder().endpoint("localhost:2001").build()?;
///
/// let found = client
///     .read(ReadRequest { search_pattern: "<a>".into() })
///     .await?;
/// println!("{}", found.result);
/// # Ok(())
/// # }
/// ```
pub struct RpcClient {
    stub: Mutex<Option<TupleSpacesClient<Channel>>>,
}

impl RpcClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Whether [`TupleSpaces::shutdown`] has been called.
    pub fn is_closed(&self) -> bool {
        self.stub.lock().is_none()
    }

    /// A handle on the shared channel for one call.
    fn stub(&self) -> Result<TupleSpacesClient<Channel>> {
        self.stub.lock().clone().ok_or(Error::Closed)
    }
}

#[async_trait]
impl TupleSpaces for RpcClient {
    async fn put(&self, request: PutRequest) -> Result<PutResponse> {
        let response = self.stub()?.put(request).await?;
        Ok(response.into_inner())
    }

    async fn read(&self, request: ReadRequest) -> Result<ReadResponse> {
        let response = self.stub()?.read(request).await?;
        Ok(response.into_inner())
    }

    async fn take(&self, request: TakeRequest) -> Result<TakeResponse> {
        let response = self.stub()?.take(request).await?;
        Ok(response.into_inner())
    }

    async fn get_tuple_spaces_state(
        &self,
        request: GetTupleSpacesStateRequest,
    ) -> Result<GetTupleSpacesStateResponse> {
        let response = self.stub()?.get_tuple_spaces_state(request).await?;
        Ok(response.into_inner())
    }

    fn shutdown(&self) {
        // The channel closes once the last handle is dropped.
        self.stub.lock().take();
    }
}

/// Turn `host:port` or a full URI into the URI the channel connects to.
pub fn endpoint_uri(endpoint: &str) -> Result<String> {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.is_empty() {
        return Err(Error::Config("endpoint is empty".to_string()));
    }

    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Ok(endpoint.to_string())
    } else {
        Ok(format!("http://{}", endpoint))
    }
}

/// Builder for creating an [`RpcClient`].
#[derive(Debug)]
pub struct ClientBuilder {
    endpoint: Option<String>,
    timeout: Duration,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            endpoint: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the server endpoint (`host:port` or URI).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    ///
    /// No connection is opened until the first call. Must be called from
    /// within a tokio runtime.
    pub fn build(self) -> Result<RpcClient> {
        let endpoint = self
            .endpoint
            .ok_or_else(|| Error::Config("endpoint is required".to_string()))?;
        let uri = endpoint_uri(&endpoint)?;

        let channel = Endpoint::from_shared(uri)
            .map_err(|e| Error::Config(format!("invalid endpoint '{}': {}", endpoint, e)))?
            .timeout(self.timeout)
            .connect_lazy();

        Ok(RpcClient {
            stub: Mutex::new(Some(TupleSpacesClient::new(channel))),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
