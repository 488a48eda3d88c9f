use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shardline_common::types::{
    self,
    resources::Page,
    stream::StreamName,
    tag::{ExclusiveStartTagKey, TagKey, TagValue},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: TagKey,
    #[serde(default)]
    pub value: TagValue,
}

impl From<types::tag::Tag> for Tag {
    fn from(value: types::tag::Tag) -> Self {
        Self {
            key: value.key,
            value: value.value,
        }
    }
}

impl From<Tag> for types::tag::Tag {
    fn from(value: Tag) -> Self {
        Self::new(value.key, value.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddTagsToStreamRequest {
    pub stream_name: StreamName,
    /// Tags to add or overwrite, up to 10 per request.
    pub tags: BTreeMap<TagKey, TagValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoveTagsFromStreamRequest {
    pub stream_name: StreamName,
    /// Keys of the tags to remove, up to 10 per request.
    pub tag_keys: Vec<TagKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTagsForStreamRequest {
    pub stream_name: StreamName,
    /// Return tags whose key sorts after this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_start_tag_key: Option<ExclusiveStartTagKey>,
    /// Maximum number of tags to return, up to 50.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTagsForStreamResponse {
    pub tags: Vec<Tag>,
    /// Indicates that more tags follow the last one returned.
    pub has_more_tags: bool,
}

impl From<ListTagsForStreamResponse> for Page<types::tag::Tag> {
    fn from(value: ListTagsForStreamResponse) -> Self {
        Page::new(
            value
                .tags
                .into_iter()
                .map(Into::into)
                .collect::<Vec<_>>(),
            value.has_more_tags,
        )
    }
}

impl From<Page<types::tag::Tag>> for ListTagsForStreamResponse {
    fn from(value: Page<types::tag::Tag>) -> Self {
        Self {
            tags: value.values.into_iter().map(Into::into).collect(),
            has_more_tags: value.has_more,
        }
    }
}
