//! In-process reference implementation of the shardline stream service.
//!
//! [`Backend`](backend::Backend) holds every stream in memory and
//! [`LiteTransport`](handlers::v1::LiteTransport) exposes it to the SDK, so
//! clients can be exercised end to end without a network.

pub mod backend;
pub mod handlers;
