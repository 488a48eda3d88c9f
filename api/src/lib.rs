//! JSON request and response bodies exchanged with a shardline stream service.

pub mod v1;
