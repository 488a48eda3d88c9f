use shardline_api::v1::{
    Empty,
    tag::{
        AddTagsToStreamRequest, ListTagsForStreamRequest, ListTagsForStreamResponse,
        RemoveTagsFromStreamRequest,
    },
};

use super::error::ServiceError;
use crate::backend::Backend;

pub fn add_tags_to_stream(
    backend: &Backend,
    request: AddTagsToStreamRequest,
) -> Result<Empty, ServiceError> {
    backend.add_tags_to_stream(request.stream_name, request.tags)?;
    Ok(Empty {})
}

pub fn remove_tags_from_stream(
    backend: &Backend,
    request: RemoveTagsFromStreamRequest,
) -> Result<Empty, ServiceError> {
    backend.remove_tags_from_stream(request.stream_name, request.tag_keys)?;
    Ok(Empty {})
}

pub fn list_tags_for_stream(
    backend: &Backend,
    request: ListTagsForStreamRequest,
) -> Result<ListTagsForStreamResponse, ServiceError> {
    let page = backend.list_tags_for_stream(
        request.stream_name,
        request.exclusive_start_tag_key,
        request.limit,
    )?;
    Ok(page.into())
}
