use shardline_api::v1::error::{ErrorCode, ErrorInfo};

use crate::backend::error::{
    AddTagsError, CreateStreamError, DeleteStreamError, DescribeStreamError, ListStreamsError,
    ListTagsError, RemoveTagsError, UpdateRetentionError, UpdateShardCountError,
};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("malformed request body: {0}")]
    BadJson(#[source] serde_json::Error),
    #[error("invalid request: {0}")]
    InvalidRequest(#[source] serde_json::Error),
    #[error("failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),
    #[error(transparent)]
    CreateStream(#[from] CreateStreamError),
    #[error(transparent)]
    DeleteStream(#[from] DeleteStreamError),
    #[error(transparent)]
    DescribeStream(#[from] DescribeStreamError),
    #[error(transparent)]
    ListStreams(#[from] ListStreamsError),
    #[error(transparent)]
    UpdateRetention(#[from] UpdateRetentionError),
    #[error(transparent)]
    UpdateShardCount(#[from] UpdateShardCountError),
    #[error(transparent)]
    AddTags(#[from] AddTagsError),
    #[error(transparent)]
    RemoveTags(#[from] RemoveTagsError),
    #[error(transparent)]
    ListTags(#[from] ListTagsError),
}

impl ServiceError {
    /// Sorts a request body failure into a syntax or a content problem.
    pub fn decode(e: serde_json::Error) -> Self {
        match e.classify() {
            serde_json::error::Category::Data => Self::InvalidRequest(e),
            _ => Self::BadJson(e),
        }
    }

    pub fn to_info(&self) -> ErrorInfo {
        match self {
            ServiceError::BadJson(e) => generic(ErrorCode::BadJson, e),
            ServiceError::InvalidRequest(e) => generic(ErrorCode::InvalidArgument, e),
            ServiceError::Encode(e) => generic(ErrorCode::Other, e),
            ServiceError::CreateStream(e) => match e {
                CreateStreamError::Validation(e) => generic(ErrorCode::InvalidArgument, e),
                CreateStreamError::StreamAlreadyExists(e) => {
                    generic(ErrorCode::ResourceInUse, e)
                }
                CreateStreamError::ShardLimitExceeded(e) => generic(ErrorCode::LimitExceeded, e),
            },
            ServiceError::DeleteStream(e) => match e {
                DeleteStreamError::StreamNotFound(e) => generic(ErrorCode::ResourceNotFound, e),
            },
            ServiceError::DescribeStream(e) => match e {
                DescribeStreamError::Validation(e) => generic(ErrorCode::InvalidArgument, e),
                DescribeStreamError::StreamNotFound(e) => {
                    generic(ErrorCode::ResourceNotFound, e)
                }
            },
            ServiceError::ListStreams(e) => match e {
                ListStreamsError::Validation(e) => generic(ErrorCode::InvalidArgument, e),
            },
            ServiceError::UpdateRetention(e) => match e {
                UpdateRetentionError::Validation(e) => generic(ErrorCode::InvalidArgument, e),
                UpdateRetentionError::StreamNotFound(e) => {
                    generic(ErrorCode::ResourceNotFound, e)
                }
                UpdateRetentionError::StreamNotActive(e) => generic(ErrorCode::ResourceInUse, e),
                UpdateRetentionError::RetentionDirection(e) => {
                    generic(ErrorCode::InvalidArgument, e)
                }
            },
            ServiceError::UpdateShardCount(e) => match e {
                UpdateShardCountError::Validation(e) => generic(ErrorCode::InvalidArgument, e),
                UpdateShardCountError::StreamNotFound(e) => {
                    generic(ErrorCode::ResourceNotFound, e)
                }
                UpdateShardCountError::StreamNotActive(e) => {
                    generic(ErrorCode::ResourceInUse, e)
                }
                UpdateShardCountError::ScalingOutOfBounds(e) => {
                    generic(ErrorCode::InvalidArgument, e)
                }
                UpdateShardCountError::ShardLimitExceeded(e) => {
                    generic(ErrorCode::LimitExceeded, e)
                }
            },
            ServiceError::AddTags(e) => match e {
                AddTagsError::Validation(e) => generic(ErrorCode::InvalidArgument, e),
                AddTagsError::StreamNotFound(e) => generic(ErrorCode::ResourceNotFound, e),
                AddTagsError::TagLimitExceeded(e) => generic(ErrorCode::LimitExceeded, e),
            },
            ServiceError::RemoveTags(e) => match e {
                RemoveTagsError::Validation(e) => generic(ErrorCode::InvalidArgument, e),
                RemoveTagsError::StreamNotFound(e) => generic(ErrorCode::ResourceNotFound, e),
            },
            ServiceError::ListTags(e) => match e {
                ListTagsError::Validation(e) => generic(ErrorCode::InvalidArgument, e),
                ListTagsError::StreamNotFound(e) => generic(ErrorCode::ResourceNotFound, e),
            },
        }
    }
}

fn generic(code: ErrorCode, e: impl ToString) -> ErrorInfo {
    ErrorInfo::new(code, e.to_string())
}
