pub mod account;
pub mod error;
pub mod streams;
pub mod tags;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use shardline_api::v1::{Operation, error::ErrorCode};
use shardline_common::types::stream::RetentionChange;
use shardline_sdk::transport::{Transport, TransportError};
use tracing::{debug, warn};

use self::error::ServiceError;
use crate::backend::Backend;

/// Decodes the body, runs the handler and encodes its response.
fn handle<Req, Res>(
    backend: &Backend,
    body: Value,
    handler: impl FnOnce(&Backend, Req) -> Result<Res, ServiceError>,
) -> Result<Value, ServiceError>
where
    Req: DeserializeOwned,
    Res: Serialize,
{
    let request = serde_json::from_value(body).map_err(ServiceError::decode)?;
    let response = handler(backend, request)?;
    serde_json::to_value(response).map_err(ServiceError::Encode)
}

pub fn dispatch(
    backend: &Backend,
    operation: Operation,
    body: Value,
) -> Result<Value, ServiceError> {
    match operation {
        Operation::AddTagsToStream => handle(backend, body, tags::add_tags_to_stream),
        Operation::CreateStream => handle(backend, body, streams::create_stream),
        Operation::DecreaseStreamRetentionPeriod => handle(backend, body, |b, req| {
            streams::update_retention_period(b, RetentionChange::Decrease, req)
        }),
        Operation::DeleteStream => handle(backend, body, streams::delete_stream),
        Operation::DescribeLimits => handle(backend, body, account::describe_limits),
        Operation::DescribeStream => handle(backend, body, streams::describe_stream),
        Operation::IncreaseStreamRetentionPeriod => handle(backend, body, |b, req| {
            streams::update_retention_period(b, RetentionChange::Increase, req)
        }),
        Operation::ListStreams => handle(backend, body, streams::list_streams),
        Operation::ListTagsForStream => handle(backend, body, tags::list_tags_for_stream),
        Operation::RemoveTagsFromStream => handle(backend, body, tags::remove_tags_from_stream),
        Operation::UpdateShardCount => handle(backend, body, streams::update_shard_count),
    }
}

/// Serves SDK requests from an in-process [`Backend`].
#[derive(Debug, Clone)]
pub struct LiteTransport {
    backend: Backend,
}

impl LiteTransport {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }
}

#[async_trait]
impl Transport for LiteTransport {
    async fn execute(
        &self,
        operation: Operation,
        body: Value,
    ) -> Result<Value, TransportError> {
        dispatch(&self.backend, operation, body).map_err(|e| {
            let info = e.to_info();
            if info.code == ErrorCode::Other {
                warn!(%operation, error = %e, "request failed");
            } else {
                debug!(%operation, code = %info.code, error = %e, "request rejected");
            }
            info.into()
        })
    }
}
