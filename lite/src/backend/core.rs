use std::{collections::BTreeMap, sync::Arc};

use parking_lot::RwLock;
use shardline_common::{
    caps,
    types::{
        shard::{HashKeyRange, SequenceNumber, SequenceNumberRange, Shard, ShardId},
        stream::{StreamName, StreamStatus},
        tag::{TagKey, TagValue},
    },
};

use super::error::{StreamNotActiveError, StreamNotFoundError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendConfig {
    /// Open shards allowed across every stream.
    pub shard_limit: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            shard_limit: caps::DEFAULT_SHARD_LIMIT,
        }
    }
}

/// In-process stream service.
///
/// Clones share state, so one backend can serve any number of clients.
#[derive(Debug, Clone)]
pub struct Backend {
    pub(super) config: BackendConfig,
    pub(super) state: Arc<RwLock<State>>,
}

#[derive(Debug, Default)]
pub(super) struct State {
    pub streams: BTreeMap<StreamName, StreamMeta>,
}

impl State {
    pub fn stream(&self, name: &StreamName) -> Result<&StreamMeta, StreamNotFoundError> {
        self.streams.get(name).ok_or_else(|| StreamNotFoundError {
            stream: name.clone(),
        })
    }

    pub fn stream_mut(
        &mut self,
        name: &StreamName,
    ) -> Result<&mut StreamMeta, StreamNotFoundError> {
        self.streams.get_mut(name).ok_or_else(|| StreamNotFoundError {
            stream: name.clone(),
        })
    }

    pub fn open_shard_count(&self) -> u64 {
        self.streams
            .values()
            .map(|meta| meta.open_shard_count() as u64)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct StreamMeta {
    pub status: StreamStatus,
    pub retention_period_hours: u32,
    /// Every shard ever created, ordered by id. Closed shards stay listed.
    pub shards: Vec<Shard>,
    pub next_shard_index: u64,
    /// Sequence number handed to the next generation of shards.
    pub next_sequence_number: u128,
    pub tags: BTreeMap<TagKey, TagValue>,
}

impl StreamMeta {
    pub fn new(shard_count: u32) -> Self {
        let mut meta = Self {
            status: StreamStatus::Active,
            retention_period_hours: caps::DEFAULT_RETENTION_HOURS,
            shards: Vec::with_capacity(shard_count as usize),
            next_shard_index: 0,
            next_sequence_number: 0,
            tags: BTreeMap::new(),
        };
        let ranges = HashKeyRange::partition(shard_count);
        meta.open_generation(ranges.into_iter().map(|range| (range, None, None)));
        meta
    }

    pub fn open_shards(&self) -> impl Iterator<Item = &Shard> {
        self.shards.iter().filter(|shard| shard.is_open())
    }

    pub fn open_shard_count(&self) -> u32 {
        self.open_shards().count() as u32
    }

    pub fn ensure_active(&self, stream: &StreamName) -> Result<(), StreamNotActiveError> {
        if self.status == StreamStatus::Active {
            Ok(())
        } else {
            Err(StreamNotActiveError {
                stream: stream.clone(),
                status: self.status,
            })
        }
    }

    /// Appends one new open shard per entry, all starting at the same
    /// sequence number.
    pub fn open_generation(
        &mut self,
        shards: impl IntoIterator<Item = (HashKeyRange, Option<ShardId>, Option<ShardId>)>,
    ) {
        let starting = SequenceNumber::from(self.next_sequence_number);
        for (hash_key_range, parent_shard_id, adjacent_parent_shard_id) in shards {
            self.shards.push(Shard {
                shard_id: ShardId::from_index(self.next_shard_index),
                parent_shard_id,
                adjacent_parent_shard_id,
                hash_key_range,
                sequence_number_range: SequenceNumberRange::open(starting.clone()),
            });
            self.next_shard_index += 1;
        }
        self.next_sequence_number += 1;
    }
}
