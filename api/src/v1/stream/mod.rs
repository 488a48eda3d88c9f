use serde::{Deserialize, Serialize};
use shardline_common::types::{
    self, ValidationError,
    resources::Page,
    shard::ExclusiveStartShardId,
    stream::{ExclusiveStartStreamName, StreamName},
};

use super::shard::Shard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StreamStatus {
    /// Stream is being created.
    Creating,
    /// Stream is being deleted.
    Deleting,
    /// Stream accepts reads and writes.
    Active,
    /// Stream is being resharded or reconfigured.
    Updating,
}

impl From<types::stream::StreamStatus> for StreamStatus {
    fn from(value: types::stream::StreamStatus) -> Self {
        match value {
            types::stream::StreamStatus::Creating => Self::Creating,
            types::stream::StreamStatus::Deleting => Self::Deleting,
            types::stream::StreamStatus::Active => Self::Active,
            types::stream::StreamStatus::Updating => Self::Updating,
        }
    }
}

impl From<StreamStatus> for types::stream::StreamStatus {
    fn from(value: StreamStatus) -> Self {
        match value {
            StreamStatus::Creating => Self::Creating,
            StreamStatus::Deleting => Self::Deleting,
            StreamStatus::Active => Self::Active,
            StreamStatus::Updating => Self::Updating,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScalingType {
    #[default]
    UniformScaling,
}

impl From<types::stream::ScalingType> for ScalingType {
    fn from(value: types::stream::ScalingType) -> Self {
        match value {
            types::stream::ScalingType::UniformScaling => Self::UniformScaling,
        }
    }
}

impl From<ScalingType> for types::stream::ScalingType {
    fn from(value: ScalingType) -> Self {
        match value {
            ScalingType::UniformScaling => Self::UniformScaling,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateStreamRequest {
    /// Stream name, unique per account.
    /// It can be between 1 and 128 characters, comprising letters, digits, `_`, `.` and `-`.
    pub stream_name: StreamName,
    /// Number of shards the stream starts with.
    pub shard_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteStreamRequest {
    pub stream_name: StreamName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeStreamRequest {
    pub stream_name: StreamName,
    /// Maximum number of shards to return, up to 10000.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Return shards whose id sorts after this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_start_shard_id: Option<ExclusiveStartShardId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamDescription {
    pub stream_name: StreamName,
    pub stream_status: StreamStatus,
    pub retention_period_hours: u32,
    pub shards: Vec<Shard>,
    /// Indicates that more shards follow the last one returned.
    pub has_more_shards: bool,
}

impl TryFrom<StreamDescription> for types::stream::StreamDescription {
    type Error = ValidationError;

    fn try_from(value: StreamDescription) -> Result<Self, Self::Error> {
        let StreamDescription {
            stream_name,
            stream_status,
            retention_period_hours,
            shards,
            has_more_shards,
        } = value;

        let shards = shards
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: stream_name,
            status: stream_status.into(),
            retention_period_hours,
            shards: Page::new(shards, has_more_shards),
        })
    }
}

impl From<types::stream::StreamDescription> for StreamDescription {
    fn from(value: types::stream::StreamDescription) -> Self {
        let types::stream::StreamDescription {
            name,
            status,
            retention_period_hours,
            shards: Page { values, has_more },
        } = value;

        Self {
            stream_name: name,
            stream_status: status.into(),
            retention_period_hours,
            shards: values.into_iter().map(Into::into).collect(),
            has_more_shards: has_more,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeStreamResponse {
    pub stream_description: StreamDescription,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListStreamsRequest {
    /// Maximum number of stream names to return, up to 10000.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Return streams whose name sorts after this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_start_stream_name: Option<ExclusiveStartStreamName>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListStreamsResponse {
    pub stream_names: Vec<StreamName>,
    /// Indicates that more streams follow the last one returned.
    pub has_more_streams: bool,
}

impl From<ListStreamsResponse> for Page<StreamName> {
    fn from(value: ListStreamsResponse) -> Self {
        Page::new(value.stream_names, value.has_more_streams)
    }
}

impl From<Page<StreamName>> for ListStreamsResponse {
    fn from(value: Page<StreamName>) -> Self {
        Self {
            stream_names: value.values,
            has_more_streams: value.has_more,
        }
    }
}

/// Body shared by the increase and decrease retention operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RetentionPeriodRequest {
    pub stream_name: StreamName,
    pub retention_period_hours: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateShardCountRequest {
    pub stream_name: StreamName,
    pub target_shard_count: u32,
    #[serde(default)]
    pub scaling_type: ScalingType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateShardCountResponse {
    pub stream_name: StreamName,
    pub current_shard_count: u32,
    pub target_shard_count: u32,
}
