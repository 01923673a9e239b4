//! RPC client SDK for a remote tuple space service.
//!
//! Two layers:
//!
//! - [`TupleSpaces`] is the raw remote service, one async method per remote
//!   procedure. [`RpcClient`] implements it over gRPC with the stubs
//!   generated from `proto/tuplespaces.proto`.
//! - [`Gateway`] wraps a service for an interactive session: it builds the
//!   requests, folds every error into an [`Outcome`], and emits diagnostics
//!   when the session runs in debug mode.
//!
//! # Example
//!
//! ```no_run
//! use tuplespaces_client::{Gateway, Outcome, SessionConfig};
//!
//! # async fn example() -> tuplespaces_client::Result<()> {
//! let config = SessionConfig::new("localhost:2001", 1, false);
//! let mut gateway = Gateway::connect(config)?;
//!
//! if let Outcome::Success(()) = gateway.put("<a,b>").await {
//!     println!("stored");
//! }
//! if let Outcome::Success(tuple) = gateway.take(1, "<a,*>").await {
//!     println!("took {}", tuple);
//! }
//!
//! gateway.close();
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod service;
pub mod types;

pub use client::{ClientBuilder, RpcClient};
pub use config::SessionConfig;
pub use error::{Error, Result};
pub use gateway::{Gateway, Operation, Outcome};
pub use service::TupleSpaces;
pub use types::*;
