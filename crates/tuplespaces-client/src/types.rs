//! Request and response types for the tuple space service.
//!
//! Generated from `proto/tuplespaces.proto` at build time. The contract's
//! camelCase fields appear here in snake case (`newTuple` is `new_tuple`).

/// Generated protobuf messages plus the gRPC client and server stubs.
pub mod proto {
    #![allow(missing_docs)]
    #![allow(clippy::all)]
    tonic::include_proto!("pt.ulisboa.tecnico.tuplespaces.centralized.contract");
}

pub use proto::{
    GetTupleSpacesStateRequest, GetTupleSpacesStateResponse, PutRequest, PutResponse, ReadRequest,
    ReadResponse, TakeRequest, TakeResponse,
};
