//! Validated value types shared by the shardline API, SDK and reference service.

pub mod caps;
pub mod types;
