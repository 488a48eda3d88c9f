use shardline_common::types::{
    shard::Shard,
    stream::StreamName,
    tag::{TagKey, TagValue},
};
use shardline_lite::{
    backend::{Backend, BackendConfig},
    handlers::v1::LiteTransport,
};
use shardline_sdk::Client;

pub fn create_backend() -> Backend {
    Backend::new(BackendConfig::default())
}

pub fn create_backend_with_shard_limit(shard_limit: u32) -> Backend {
    Backend::new(BackendConfig { shard_limit })
}

pub fn create_client(backend: &Backend) -> Client<LiteTransport> {
    Client::new(LiteTransport::new(backend.clone()))
}

pub fn test_stream_name(suffix: &str) -> StreamName {
    format!("test-stream-{suffix}").parse().unwrap()
}

pub fn tag(key: &str, value: &str) -> (TagKey, TagValue) {
    (key.parse().unwrap(), value.parse().unwrap())
}

pub fn all_shards(backend: &Backend, stream: &StreamName) -> Vec<Shard> {
    backend
        .describe_stream(stream.clone(), Some(10_000), None)
        .expect("describe stream")
        .shards
        .values
}
