use shardline_api::v1::{
    Empty,
    stream::{
        CreateStreamRequest, DeleteStreamRequest, DescribeStreamRequest, DescribeStreamResponse,
        ListStreamsRequest, ListStreamsResponse, RetentionPeriodRequest, UpdateShardCountRequest,
        UpdateShardCountResponse,
    },
};
use shardline_common::types::stream::RetentionChange;

use super::error::ServiceError;
use crate::backend::Backend;

pub fn create_stream(
    backend: &Backend,
    request: CreateStreamRequest,
) -> Result<Empty, ServiceError> {
    backend.create_stream(request.stream_name, request.shard_count)?;
    Ok(Empty {})
}

pub fn delete_stream(
    backend: &Backend,
    request: DeleteStreamRequest,
) -> Result<Empty, ServiceError> {
    backend.delete_stream(request.stream_name)?;
    Ok(Empty {})
}

pub fn describe_stream(
    backend: &Backend,
    request: DescribeStreamRequest,
) -> Result<DescribeStreamResponse, ServiceError> {
    let description = backend.describe_stream(
        request.stream_name,
        request.limit,
        request.exclusive_start_shard_id,
    )?;
    Ok(DescribeStreamResponse {
        stream_description: description.into(),
    })
}

pub fn list_streams(
    backend: &Backend,
    request: ListStreamsRequest,
) -> Result<ListStreamsResponse, ServiceError> {
    let page = backend.list_streams(request.limit, request.exclusive_start_stream_name)?;
    Ok(page.into())
}

pub fn update_retention_period(
    backend: &Backend,
    change: RetentionChange,
    request: RetentionPeriodRequest,
) -> Result<Empty, ServiceError> {
    backend.update_retention_period(
        request.stream_name,
        change,
        request.retention_period_hours,
    )?;
    Ok(Empty {})
}

pub fn update_shard_count(
    backend: &Backend,
    request: UpdateShardCountRequest,
) -> Result<UpdateShardCountResponse, ServiceError> {
    let current_shard_count =
        backend.update_shard_count(request.stream_name.clone(), request.target_shard_count)?;
    Ok(UpdateShardCountResponse {
        stream_name: request.stream_name,
        current_shard_count,
        target_shard_count: request.target_shard_count,
    })
}
