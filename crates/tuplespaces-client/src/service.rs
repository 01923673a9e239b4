//! The remote tuple space service as seen by the client.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    GetTupleSpacesStateRequest, GetTupleSpacesStateResponse, PutRequest, PutResponse, ReadRequest,
    ReadResponse, TakeRequest, TakeResponse,
};

/// One method per remote procedure.
///
/// [`RpcClient`](crate::RpcClient) is the production implementation; tests
/// substitute in-memory fakes.
#[async_trait]
pub trait TupleSpaces: Send + Sync {
    /// Store a tuple.
    async fn put(&self, request: PutRequest) -> Result<PutResponse>;

    /// Return a tuple matching the pattern without removing it.
    async fn read(&self, request: ReadRequest) -> Result<ReadResponse>;

    /// Remove and return a tuple matching the pattern.
    async fn take(&self, request: TakeRequest) -> Result<TakeResponse>;

    /// Snapshot every stored tuple.
    async fn get_tuple_spaces_state(
        &self,
        request: GetTupleSpacesStateRequest,
    ) -> Result<GetTupleSpacesStateResponse>;

    /// Release the connection.
    fn shutdown(&self);
}
