use std::{io, sync::Arc};

use shardline_common::types::{
    ValidationError,
    stream::{RetentionChange, StreamName, StreamStatus},
};

#[derive(Debug, Clone, thiserror::Error)]
#[error("stream `{stream}` not found")]
pub struct StreamNotFoundError {
    pub stream: StreamName,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("stream `{stream}` already exists")]
pub struct StreamAlreadyExistsError {
    pub stream: StreamName,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("stream `{stream}` is {status}, not ACTIVE")]
pub struct StreamNotActiveError {
    pub stream: StreamName,
    pub status: StreamStatus,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("account shard limit of {limit} would be exceeded: {requested} open shards requested")]
pub struct ShardLimitExceededError {
    pub limit: u32,
    pub requested: u64,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("stream `{stream}` would carry {requested} tags, above the limit of {limit}")]
pub struct TagLimitExceededError {
    pub stream: StreamName,
    pub limit: usize,
    pub requested: usize,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("cannot {change:?} retention of `{stream}` from {current}h to {requested}h")]
pub struct RetentionDirectionError {
    pub stream: StreamName,
    pub change: RetentionChange,
    pub current: u32,
    pub requested: u32,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error(
    "target shard count {target} for `{stream}` must be between half and double \
     the current count of {current}"
)]
pub struct ScalingOutOfBoundsError {
    pub stream: StreamName,
    pub current: u32,
    pub target: u32,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CreateStreamError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    StreamAlreadyExists(#[from] StreamAlreadyExistsError),
    #[error(transparent)]
    ShardLimitExceeded(#[from] ShardLimitExceededError),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum DeleteStreamError {
    #[error(transparent)]
    StreamNotFound(#[from] StreamNotFoundError),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum DescribeStreamError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    StreamNotFound(#[from] StreamNotFoundError),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ListStreamsError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UpdateRetentionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    StreamNotFound(#[from] StreamNotFoundError),
    #[error(transparent)]
    StreamNotActive(#[from] StreamNotActiveError),
    #[error(transparent)]
    RetentionDirection(#[from] RetentionDirectionError),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UpdateShardCountError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    StreamNotFound(#[from] StreamNotFoundError),
    #[error(transparent)]
    StreamNotActive(#[from] StreamNotActiveError),
    #[error(transparent)]
    ScalingOutOfBounds(#[from] ScalingOutOfBoundsError),
    #[error(transparent)]
    ShardLimitExceeded(#[from] ShardLimitExceededError),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AddTagsError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    StreamNotFound(#[from] StreamNotFoundError),
    #[error(transparent)]
    TagLimitExceeded(#[from] TagLimitExceededError),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum RemoveTagsError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    StreamNotFound(#[from] StreamNotFoundError),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ListTagsError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    StreamNotFound(#[from] StreamNotFoundError),
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("stream `{stream}` {problem}")]
pub struct InconsistentStreamError {
    pub stream: StreamName,
    pub problem: String,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot io: {0}")]
    Io(Arc<io::Error>),
    #[error("snapshot format: {0}")]
    Format(Arc<serde_json::Error>),
    #[error("snapshot content: {0}")]
    Content(#[from] ValidationError),
    #[error("snapshot content: {0}")]
    Inconsistent(#[from] InconsistentStreamError),
}

impl From<io::Error> for SnapshotError {
    fn from(error: io::Error) -> Self {
        Self::Io(Arc::new(error))
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(error: serde_json::Error) -> Self {
        Self::Format(Arc::new(error))
    }
}
