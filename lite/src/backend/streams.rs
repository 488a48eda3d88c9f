use shardline_common::{
    caps,
    types::{
        ValidationError, check_range,
        resources::{ListLimit, Page},
        shard::{ExclusiveStartShardId, HashKey, HashKeyRange, SequenceNumber, Shard},
        stream::{ExclusiveStartStreamName, RetentionChange, StreamDescription, StreamName},
    },
};
use tracing::instrument;

use super::{
    Backend,
    core::{State, StreamMeta},
    error::{
        CreateStreamError, DeleteStreamError, DescribeStreamError, ListStreamsError,
        RetentionDirectionError, ScalingOutOfBoundsError, ShardLimitExceededError,
        StreamAlreadyExistsError, StreamNotFoundError, UpdateRetentionError,
        UpdateShardCountError,
    },
};

fn check_shard_count(field: &'static str, count: u32) -> Result<(), ValidationError> {
    check_range(field, u64::from(count), 1..=u64::from(caps::MAX_SHARD_COUNT))
}

fn check_limit(limit: Option<usize>, max: usize) -> Result<ListLimit, ValidationError> {
    match limit {
        Some(limit) => {
            check_range("Limit", limit as u64, 1..=max as u64)?;
            Ok(ListLimit::capped(limit, max))
        }
        None => Ok(ListLimit::capped(0, max)),
    }
}

impl Backend {
    fn check_shard_limit(
        &self,
        state: &State,
        added: u64,
        removed: u64,
    ) -> Result<(), ShardLimitExceededError> {
        let requested = state.open_shard_count() - removed + added;
        if requested > u64::from(self.config.shard_limit) {
            return Err(ShardLimitExceededError {
                limit: self.config.shard_limit,
                requested,
            });
        }
        Ok(())
    }

    #[instrument(ret, err, skip(self))]
    pub fn create_stream(
        &self,
        stream: StreamName,
        shard_count: u32,
    ) -> Result<(), CreateStreamError> {
        check_shard_count("ShardCount", shard_count)?;

        let mut state = self.state.write();
        if state.streams.contains_key(&stream) {
            return Err(StreamAlreadyExistsError { stream }.into());
        }
        self.check_shard_limit(&state, u64::from(shard_count), 0)?;
        state.streams.insert(stream, StreamMeta::new(shard_count));
        Ok(())
    }

    #[instrument(ret, err, skip(self))]
    pub fn delete_stream(&self, stream: StreamName) -> Result<(), DeleteStreamError> {
        let mut state = self.state.write();
        match state.streams.remove(&stream) {
            Some(_) => Ok(()),
            None => Err(StreamNotFoundError { stream }.into()),
        }
    }

    /// Describes a stream with one page of its shards, ordered by shard id.
    #[instrument(err, skip(self))]
    pub fn describe_stream(
        &self,
        stream: StreamName,
        limit: Option<usize>,
        exclusive_start_shard_id: Option<ExclusiveStartShardId>,
    ) -> Result<StreamDescription, DescribeStreamError> {
        let limit = check_limit(limit, caps::MAX_DESCRIBE_STREAM_LIMIT)?;

        let state = self.state.read();
        let meta = state.stream(&stream)?;

        let start = match &exclusive_start_shard_id {
            Some(after) => meta
                .shards
                .partition_point(|shard| shard.shard_id.as_ref() <= after.as_ref()),
            None => 0,
        };
        let remaining = &meta.shards[start..];
        let has_more = remaining.len() > limit.as_usize();
        let shards: Vec<Shard> = remaining.iter().take(limit.as_usize()).cloned().collect();

        Ok(StreamDescription {
            name: stream,
            status: meta.status,
            retention_period_hours: meta.retention_period_hours,
            shards: Page::new(shards, has_more),
        })
    }

    /// Stream names in ascending order, starting after the cursor.
    #[instrument(err, skip(self))]
    pub fn list_streams(
        &self,
        limit: Option<usize>,
        exclusive_start_stream_name: Option<ExclusiveStartStreamName>,
    ) -> Result<Page<StreamName>, ListStreamsError> {
        let limit = check_limit(limit, caps::MAX_LIST_STREAMS_LIMIT)?;

        let state = self.state.read();
        let mut names = state
            .streams
            .keys()
            .filter(|name| {
                exclusive_start_stream_name
                    .as_ref()
                    .is_none_or(|after| name.as_ref() > after.as_ref())
            })
            .cloned();

        let values: Vec<_> = names.by_ref().take(limit.as_usize()).collect();
        let has_more = names.next().is_some();
        Ok(Page::new(values, has_more))
    }

    #[instrument(ret, err, skip(self))]
    pub fn update_retention_period(
        &self,
        stream: StreamName,
        change: RetentionChange,
        retention_period_hours: u32,
    ) -> Result<(), UpdateRetentionError> {
        change.check(retention_period_hours)?;

        let mut state = self.state.write();
        let meta = state.stream_mut(&stream)?;
        meta.ensure_active(&stream)?;
        if !change.permits(meta.retention_period_hours, retention_period_hours) {
            return Err(RetentionDirectionError {
                current: meta.retention_period_hours,
                requested: retention_period_hours,
                stream,
                change,
            }
            .into());
        }
        meta.retention_period_hours = retention_period_hours;
        Ok(())
    }

    /// Uniformly rescales a stream: every open shard is closed and
    /// `target_shard_count` shards of equal width replace them.
    ///
    /// Returns the open shard count before the change.
    #[instrument(ret, err, skip(self))]
    pub fn update_shard_count(
        &self,
        stream: StreamName,
        target_shard_count: u32,
    ) -> Result<u32, UpdateShardCountError> {
        check_shard_count("TargetShardCount", target_shard_count)?;

        let mut state = self.state.write();
        let current = {
            let meta = state.stream(&stream)?;
            meta.ensure_active(&stream)?;
            meta.open_shard_count()
        };
        if target_shard_count == current {
            return Ok(current);
        }
        if u64::from(target_shard_count) > 2 * u64::from(current)
            || target_shard_count < current.div_ceil(2)
        {
            return Err(ScalingOutOfBoundsError {
                stream,
                current,
                target: target_shard_count,
            }
            .into());
        }
        self.check_shard_limit(&state, u64::from(target_shard_count), u64::from(current))?;

        let meta = state.stream_mut(&stream)?;
        reshard(meta, target_shard_count)?;
        Ok(current)
    }
}

fn reshard(meta: &mut StreamMeta, target_shard_count: u32) -> Result<(), ValidationError> {
    let parents: Vec<_> = meta
        .open_shards()
        .map(|shard| (shard.shard_id.clone(), shard.hash_key_range))
        .collect();

    // Nothing is written to `meta` until every open shard has closed.
    let closing = SequenceNumber::from(meta.next_sequence_number);
    let mut shards = meta.shards.clone();
    for shard in shards.iter_mut().filter(|shard| shard.is_open()) {
        shard.sequence_number_range = shard
            .sequence_number_range
            .clone()
            .close(closing.clone())?;
    }
    meta.shards = shards;
    meta.next_sequence_number += 1;

    let parent_of = |key: HashKey| {
        parents
            .iter()
            .find(|(_, range)| range.contains(key))
            .map(|(id, _)| id.clone())
    };
    let generation: Vec<_> = HashKeyRange::partition(target_shard_count)
        .into_iter()
        .map(|range| {
            let parent = parent_of(range.starting());
            let adjacent = parent_of(range.ending()).filter(|id| Some(id) != parent.as_ref());
            (range, parent, adjacent)
        })
        .collect();
    meta.open_generation(generation);
    Ok(())
}
