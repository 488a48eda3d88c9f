//! Request builders.
//!
//! Each `with_*` method consumes the input and returns the updated value, so
//! no partially built request is ever shared. Validation happens when the
//! client receives the input, before any transport call.

use std::collections::{BTreeMap, HashSet};

use shardline_api::v1::{stream as v1s, tag as v1t};
pub use shardline_common::types::{
    Constraint, Validate, Validated, ValidationError, ValidationErrors, Validator,
    account::AccountLimits,
    resources::{ListLimit, Page},
    shard::{
        ExclusiveStartShardId, HashKey, HashKeyRange, SequenceNumber, SequenceNumberRange, Shard,
        ShardId,
    },
    stream::{
        ExclusiveStartStreamName, RetentionChange, ScalingType, StreamDescription, StreamName,
        StreamStatus,
    },
    tag::{ExclusiveStartTagKey, Tag, TagKey, TagValue},
};
use shardline_common::caps;

fn check_limit(v: &mut Validator, limit: Option<usize>, max: usize) {
    if let Some(limit) = limit {
        v.range("Limit", limit as u64, 1..=max as u64);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateStreamInput {
    pub stream_name: StreamName,
    pub shard_count: u32,
}

impl CreateStreamInput {
    pub fn new(stream_name: StreamName) -> Self {
        Self {
            stream_name,
            shard_count: 1,
        }
    }

    pub fn with_shard_count(self, shard_count: u32) -> Self {
        Self {
            shard_count,
            ..self
        }
    }
}

impl Validate for CreateStreamInput {
    fn check(&self, v: &mut Validator) {
        v.range(
            "ShardCount",
            u64::from(self.shard_count),
            1..=u64::from(caps::MAX_SHARD_COUNT),
        );
    }
}

impl From<CreateStreamInput> for v1s::CreateStreamRequest {
    fn from(value: CreateStreamInput) -> Self {
        Self {
            stream_name: value.stream_name,
            shard_count: value.shard_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteStreamInput {
    pub stream_name: StreamName,
}

impl DeleteStreamInput {
    pub fn new(stream_name: StreamName) -> Self {
        Self { stream_name }
    }
}

impl Validate for DeleteStreamInput {
    fn check(&self, _: &mut Validator) {}
}

impl From<DeleteStreamInput> for v1s::DeleteStreamRequest {
    fn from(value: DeleteStreamInput) -> Self {
        Self {
            stream_name: value.stream_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeStreamInput {
    pub stream_name: StreamName,
    pub limit: Option<usize>,
    pub exclusive_start_shard_id: Option<ExclusiveStartShardId>,
}

impl DescribeStreamInput {
    pub fn new(stream_name: StreamName) -> Self {
        Self {
            stream_name,
            limit: None,
            exclusive_start_shard_id: None,
        }
    }

    pub fn with_limit(self, limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..self
        }
    }

    pub fn with_exclusive_start_shard_id(self, shard_id: impl Into<ExclusiveStartShardId>) -> Self {
        Self {
            exclusive_start_shard_id: Some(shard_id.into()),
            ..self
        }
    }
}

impl Validate for DescribeStreamInput {
    fn check(&self, v: &mut Validator) {
        check_limit(v, self.limit, caps::MAX_DESCRIBE_STREAM_LIMIT);
    }
}

impl From<DescribeStreamInput> for v1s::DescribeStreamRequest {
    fn from(value: DescribeStreamInput) -> Self {
        Self {
            stream_name: value.stream_name,
            limit: value.limit,
            exclusive_start_shard_id: value.exclusive_start_shard_id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListStreamsInput {
    pub limit: Option<usize>,
    pub exclusive_start_stream_name: Option<ExclusiveStartStreamName>,
}

impl ListStreamsInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(self, limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..self
        }
    }

    pub fn with_exclusive_start_stream_name(
        self,
        stream_name: impl Into<ExclusiveStartStreamName>,
    ) -> Self {
        Self {
            exclusive_start_stream_name: Some(stream_name.into()),
            ..self
        }
    }
}

impl Validate for ListStreamsInput {
    fn check(&self, v: &mut Validator) {
        check_limit(v, self.limit, caps::MAX_LIST_STREAMS_LIMIT);
    }
}

impl From<ListStreamsInput> for v1s::ListStreamsRequest {
    fn from(value: ListStreamsInput) -> Self {
        Self {
            limit: value.limit,
            exclusive_start_stream_name: value.exclusive_start_stream_name,
        }
    }
}

/// Shared body of the two retention inputs; `change` fixes the permitted range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionPeriodInput {
    pub stream_name: StreamName,
    pub retention_period_hours: u32,
    pub change: RetentionChange,
}

pub type IncreaseStreamRetentionPeriodInput = RetentionPeriodInput;

pub type DecreaseStreamRetentionPeriodInput = RetentionPeriodInput;

impl RetentionPeriodInput {
    pub fn increase(stream_name: StreamName, retention_period_hours: u32) -> Self {
        Self {
            stream_name,
            retention_period_hours,
            change: RetentionChange::Increase,
        }
    }

    pub fn decrease(stream_name: StreamName, retention_period_hours: u32) -> Self {
        Self {
            stream_name,
            retention_period_hours,
            change: RetentionChange::Decrease,
        }
    }
}

impl Validate for RetentionPeriodInput {
    fn check(&self, v: &mut Validator) {
        v.check(self.change.check(self.retention_period_hours));
    }
}

impl From<RetentionPeriodInput> for v1s::RetentionPeriodRequest {
    fn from(value: RetentionPeriodInput) -> Self {
        Self {
            stream_name: value.stream_name,
            retention_period_hours: value.retention_period_hours,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateShardCountInput {
    pub stream_name: StreamName,
    pub target_shard_count: u32,
    pub scaling_type: ScalingType,
}

impl UpdateShardCountInput {
    pub fn new(stream_name: StreamName, target_shard_count: u32) -> Self {
        Self {
            stream_name,
            target_shard_count,
            scaling_type: ScalingType::default(),
        }
    }

    pub fn with_scaling_type(self, scaling_type: ScalingType) -> Self {
        Self {
            scaling_type,
            ..self
        }
    }
}

impl Validate for UpdateShardCountInput {
    fn check(&self, v: &mut Validator) {
        v.range(
            "TargetShardCount",
            u64::from(self.target_shard_count),
            1..=u64::from(caps::MAX_SHARD_COUNT),
        );
    }
}

impl From<UpdateShardCountInput> for v1s::UpdateShardCountRequest {
    fn from(value: UpdateShardCountInput) -> Self {
        Self {
            stream_name: value.stream_name,
            target_shard_count: value.target_shard_count,
            scaling_type: value.scaling_type.into(),
        }
    }
}

/// Shard counts reported after a scaling request was accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateShardCountOutput {
    pub stream_name: StreamName,
    pub current_shard_count: u32,
    pub target_shard_count: u32,
}

impl From<v1s::UpdateShardCountResponse> for UpdateShardCountOutput {
    fn from(value: v1s::UpdateShardCountResponse) -> Self {
        Self {
            stream_name: value.stream_name,
            current_shard_count: value.current_shard_count,
            target_shard_count: value.target_shard_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddTagsToStreamInput {
    pub stream_name: StreamName,
    pub tags: BTreeMap<TagKey, TagValue>,
}

impl AddTagsToStreamInput {
    pub fn new(stream_name: StreamName) -> Self {
        Self {
            stream_name,
            tags: BTreeMap::new(),
        }
    }

    /// Adds one tag; a repeated key keeps the last value.
    pub fn with_tag(mut self, key: TagKey, value: TagValue) -> Self {
        self.tags.insert(key, value);
        self
    }

    pub fn with_tags(self, tags: impl IntoIterator<Item = Tag>) -> Self {
        tags.into_iter()
            .fold(self, |input, tag| input.with_tag(tag.key, tag.value))
    }
}

impl Validate for AddTagsToStreamInput {
    fn check(&self, v: &mut Validator) {
        v.count("Tags", self.tags.len(), caps::TAGS_PER_REQUEST);
    }
}

impl From<AddTagsToStreamInput> for v1t::AddTagsToStreamRequest {
    fn from(value: AddTagsToStreamInput) -> Self {
        Self {
            stream_name: value.stream_name,
            tags: value.tags,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveTagsFromStreamInput {
    pub stream_name: StreamName,
    pub tag_keys: Vec<TagKey>,
}

impl RemoveTagsFromStreamInput {
    pub fn new(stream_name: StreamName) -> Self {
        Self {
            stream_name,
            tag_keys: Vec::new(),
        }
    }

    pub fn with_tag_key(mut self, key: TagKey) -> Self {
        self.tag_keys.push(key);
        self
    }

    pub fn with_tag_keys(mut self, keys: impl IntoIterator<Item = TagKey>) -> Self {
        self.tag_keys.extend(keys);
        self
    }
}

impl Validate for RemoveTagsFromStreamInput {
    fn check(&self, v: &mut Validator) {
        v.count("TagKeys", self.tag_keys.len(), caps::TAGS_PER_REQUEST);
        let mut seen = HashSet::with_capacity(self.tag_keys.len());
        for (i, key) in self.tag_keys.iter().enumerate() {
            if !seen.insert(key) {
                v.push(ValidationError::new(
                    format!("TagKeys[{i}]"),
                    Constraint::Unique,
                    key,
                ));
            }
        }
    }
}

impl From<RemoveTagsFromStreamInput> for v1t::RemoveTagsFromStreamRequest {
    fn from(value: RemoveTagsFromStreamInput) -> Self {
        Self {
            stream_name: value.stream_name,
            tag_keys: value.tag_keys,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTagsForStreamInput {
    pub stream_name: StreamName,
    pub exclusive_start_tag_key: Option<ExclusiveStartTagKey>,
    pub limit: Option<usize>,
}

impl ListTagsForStreamInput {
    pub fn new(stream_name: StreamName) -> Self {
        Self {
            stream_name,
            exclusive_start_tag_key: None,
            limit: None,
        }
    }

    pub fn with_limit(self, limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..self
        }
    }

    pub fn with_exclusive_start_tag_key(self, key: impl Into<ExclusiveStartTagKey>) -> Self {
        Self {
            exclusive_start_tag_key: Some(key.into()),
            ..self
        }
    }
}

impl Validate for ListTagsForStreamInput {
    fn check(&self, v: &mut Validator) {
        check_limit(v, self.limit, caps::MAX_LIST_TAGS_LIMIT);
    }
}

impl From<ListTagsForStreamInput> for v1t::ListTagsForStreamRequest {
    fn from(value: ListTagsForStreamInput) -> Self {
        Self {
            stream_name: value.stream_name,
            exclusive_start_tag_key: value.exclusive_start_tag_key,
            limit: value.limit,
        }
    }
}

/// Settings for a paginated listing. Page size `0` means the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationInput<C> {
    pub page_size: usize,
    pub exclusive_start: Option<C>,
    pub max_items: Option<usize>,
}

impl<C> Default for PaginationInput<C> {
    fn default() -> Self {
        Self {
            page_size: 0,
            exclusive_start: None,
            max_items: None,
        }
    }
}

impl<C> PaginationInput<C> {
    pub fn with_page_size(self, page_size: usize) -> Self {
        Self { page_size, ..self }
    }

    /// Resume a listing after a known item, e.g. the cursor of an aborted listing.
    pub fn with_exclusive_start(self, cursor: impl Into<C>) -> Self {
        Self {
            exclusive_start: Some(cursor.into()),
            ..self
        }
    }

    pub fn with_max_items(self, max_items: usize) -> Self {
        Self {
            max_items: Some(max_items),
            ..self
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListAllStreamsInput {
    pub pagination: PaginationInput<ExclusiveStartStreamName>,
}

impl ListAllStreamsInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(self, page_size: usize) -> Self {
        Self {
            pagination: self.pagination.with_page_size(page_size),
        }
    }

    pub fn with_exclusive_start_stream_name(
        self,
        stream_name: impl Into<ExclusiveStartStreamName>,
    ) -> Self {
        Self {
            pagination: self.pagination.with_exclusive_start(stream_name),
        }
    }

    pub fn with_max_items(self, max_items: usize) -> Self {
        Self {
            pagination: self.pagination.with_max_items(max_items),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListAllShardsInput {
    pub stream_name: StreamName,
    pub pagination: PaginationInput<ExclusiveStartShardId>,
}

impl ListAllShardsInput {
    pub fn new(stream_name: StreamName) -> Self {
        Self {
            stream_name,
            pagination: PaginationInput::default(),
        }
    }

    pub fn with_page_size(self, page_size: usize) -> Self {
        Self {
            pagination: self.pagination.with_page_size(page_size),
            ..self
        }
    }

    pub fn with_exclusive_start_shard_id(self, shard_id: impl Into<ExclusiveStartShardId>) -> Self {
        Self {
            pagination: self.pagination.with_exclusive_start(shard_id),
            ..self
        }
    }

    pub fn with_max_items(self, max_items: usize) -> Self {
        Self {
            pagination: self.pagination.with_max_items(max_items),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListAllTagsInput {
    pub stream_name: StreamName,
    pub pagination: PaginationInput<ExclusiveStartTagKey>,
}

impl ListAllTagsInput {
    pub fn new(stream_name: StreamName) -> Self {
        Self {
            stream_name,
            pagination: PaginationInput::default(),
        }
    }

    pub fn with_page_size(self, page_size: usize) -> Self {
        Self {
            pagination: self.pagination.with_page_size(page_size),
            ..self
        }
    }

    pub fn with_exclusive_start_tag_key(self, key: impl Into<ExclusiveStartTagKey>) -> Self {
        Self {
            pagination: self.pagination.with_exclusive_start(key),
            ..self
        }
    }

    pub fn with_max_items(self, max_items: usize) -> Self {
        Self {
            pagination: self.pagination.with_max_items(max_items),
            ..self
        }
    }
}
