//! JSON snapshots of the whole service state, so a process can pick up
//! where a previous one stopped.

use std::{collections::BTreeMap, fs, path::Path, sync::Arc};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shardline_api::v1::{shard as v1_shard, stream as v1_stream};
use shardline_common::types::{
    shard::{SequenceNumber, Shard, ShardId},
    stream::StreamName,
    tag::{TagKey, TagValue},
};
use tracing::debug;

use super::{
    Backend, BackendConfig,
    core::{State, StreamMeta},
    error::{InconsistentStreamError, SnapshotError},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Snapshot {
    pub streams: Vec<StreamSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamSnapshot {
    pub stream_name: StreamName,
    pub stream_status: v1_stream::StreamStatus,
    pub retention_period_hours: u32,
    pub shards: Vec<v1_shard::Shard>,
    pub next_shard_index: u64,
    pub next_sequence_number: u128,
    #[serde(default)]
    pub tags: BTreeMap<TagKey, TagValue>,
}

impl Snapshot {
    /// Reads a snapshot. A missing file is an empty snapshot.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        match fs::read(path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no snapshot, starting empty");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Writes through a temporary file so a crash never leaves a torn snapshot.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(self)?)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl Backend {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(State::default())),
        }
    }

    pub fn config(&self) -> BackendConfig {
        self.config
    }

    /// Restores a backend. Every stream's open shards must still cover the
    /// hash key space, and its counters must lie past every recorded shard.
    pub fn from_snapshot(
        config: BackendConfig,
        snapshot: Snapshot,
    ) -> Result<Self, SnapshotError> {
        let mut state = State::default();
        for stream in snapshot.streams {
            let shards = stream
                .shards
                .into_iter()
                .map(Shard::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            Shard::check_open_coverage(&shards)?;
            check_counters(
                &stream.stream_name,
                &shards,
                stream.next_shard_index,
                stream.next_sequence_number,
            )?;
            state.streams.insert(
                stream.stream_name,
                StreamMeta {
                    status: stream.stream_status.into(),
                    retention_period_hours: stream.retention_period_hours,
                    shards,
                    next_shard_index: stream.next_shard_index,
                    next_sequence_number: stream.next_sequence_number,
                    tags: stream.tags,
                },
            );
        }
        Ok(Self {
            config,
            state: Arc::new(RwLock::new(state)),
        })
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = self.state.read();
        Snapshot {
            streams: state
                .streams
                .iter()
                .map(|(name, meta)| StreamSnapshot {
                    stream_name: name.clone(),
                    stream_status: meta.status.into(),
                    retention_period_hours: meta.retention_period_hours,
                    shards: meta.shards.iter().cloned().map(Into::into).collect(),
                    next_shard_index: meta.next_shard_index,
                    next_sequence_number: meta.next_sequence_number,
                    tags: meta.tags.clone(),
                })
                .collect(),
        }
    }
}

/// Shards must be in strictly ascending id order, and the next id and
/// sequence number handed out must not collide with recorded ones.
fn check_counters(
    stream: &StreamName,
    shards: &[Shard],
    next_shard_index: u64,
    next_sequence_number: u128,
) -> Result<(), InconsistentStreamError> {
    let inconsistent = |problem: String| InconsistentStreamError {
        stream: stream.clone(),
        problem,
    };

    for pair in shards.windows(2) {
        let (prev, next) = (&pair[0].shard_id, &pair[1].shard_id);
        if prev == next {
            return Err(inconsistent(format!("repeats shard id `{next}`")));
        }
        if prev > next {
            return Err(inconsistent(format!(
                "lists shard `{next}` after `{prev}`, out of id order"
            )));
        }
    }

    let next_id = ShardId::from_index(next_shard_index);
    if let Some(last) = shards.last()
        && next_id <= last.shard_id
    {
        return Err(inconsistent(format!(
            "would assign `{next_id}` next, not after existing shard `{}`",
            last.shard_id
        )));
    }

    let next_sequence = SequenceNumber::from(next_sequence_number);
    for shard in shards {
        let range = &shard.sequence_number_range;
        let highest = range.ending().unwrap_or(range.starting());
        if *highest >= next_sequence {
            return Err(inconsistent(format!(
                "would reuse sequence number {highest} of shard `{}`",
                shard.shard_id
            )));
        }
    }
    Ok(())
}
