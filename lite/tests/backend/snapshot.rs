use std::collections::BTreeMap;

use shardline_common::types::stream::{RetentionChange, StreamStatus};
use shardline_lite::backend::{
    Backend, BackendConfig,
    error::{SnapshotError, UpdateShardCountError},
    snapshot::Snapshot,
};

use crate::common::*;

#[test]
fn test_snapshot_restores_state() {
    let backend = create_backend();
    let stream = test_stream_name("snap");
    backend.create_stream(stream.clone(), 2).unwrap();
    backend.update_shard_count(stream.clone(), 3).unwrap();
    backend
        .update_retention_period(stream.clone(), RetentionChange::Increase, 96)
        .unwrap();
    backend
        .add_tags_to_stream(stream.clone(), BTreeMap::from([tag("env", "test")]))
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("snapshot.json");
    backend.snapshot().save(&path).unwrap();

    let restored =
        Backend::from_snapshot(BackendConfig::default(), Snapshot::load(&path).unwrap()).unwrap();
    assert_eq!(restored.snapshot(), backend.snapshot());

    // New shards continue the id sequence after a restore.
    restored.update_shard_count(stream.clone(), 4).unwrap();
    let shards = all_shards(&restored, &stream);
    assert_eq!(shards.last().unwrap().shard_id.as_ref(), "shardId-000000000008");
}

#[test]
fn test_missing_snapshot_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = Snapshot::load(&dir.path().join("absent.json")).unwrap();
    assert!(snapshot.streams.is_empty());
}

#[test]
fn test_corrupt_snapshot_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    std::fs::write(&path, "{not json").unwrap();
    assert!(matches!(Snapshot::load(&path), Err(SnapshotError::Format(_))));
}

#[test]
fn test_snapshot_with_coverage_gap_is_rejected() {
    let backend = create_backend();
    backend.create_stream(test_stream_name("gap"), 2).unwrap();
    let mut snapshot = backend.snapshot();
    snapshot.streams[0].shards.pop();

    assert!(matches!(
        Backend::from_snapshot(BackendConfig::default(), snapshot),
        Err(SnapshotError::Content(e)) if e.field == "HashKeyRange"
    ));
}

#[test]
fn test_restored_stream_in_transition_rejects_updates() {
    let backend = create_backend();
    let stream = test_stream_name("updating");
    backend.create_stream(stream.clone(), 1).unwrap();
    let mut snapshot = backend.snapshot();
    snapshot.streams[0].stream_status = StreamStatus::Updating.into();

    let restored = Backend::from_snapshot(BackendConfig::default(), snapshot).unwrap();
    assert!(matches!(
        restored.update_shard_count(stream, 2),
        Err(UpdateShardCountError::StreamNotActive(e)) if e.status == StreamStatus::Updating
    ));
}

/// A stream with two closed parents and three open children.
fn rescaled_snapshot() -> Snapshot {
    let backend = create_backend();
    let stream = test_stream_name("counters");
    backend.create_stream(stream.clone(), 2).unwrap();
    backend.update_shard_count(stream, 3).unwrap();
    backend.snapshot()
}

fn assert_inconsistent(snapshot: Snapshot, problem: &str) {
    match Backend::from_snapshot(BackendConfig::default(), snapshot) {
        Err(SnapshotError::Inconsistent(e)) => {
            assert!(e.problem.contains(problem), "unexpected problem: {}", e.problem)
        }
        other => panic!("expected an inconsistent snapshot, got {other:?}"),
    }
}

#[test]
fn test_snapshot_with_stale_shard_index_is_rejected() {
    let mut snapshot = rescaled_snapshot();
    snapshot.streams[0].next_shard_index = 0;
    assert_inconsistent(snapshot, "would assign `shardId-000000000000` next");

    let mut snapshot = rescaled_snapshot();
    snapshot.streams[0].next_shard_index = 4;
    assert_inconsistent(snapshot, "shardId-000000000004");
}

#[test]
fn test_snapshot_with_stale_sequence_number_is_rejected() {
    let mut snapshot = rescaled_snapshot();
    // Open children start at 2.
    snapshot.streams[0].next_sequence_number = 2;
    assert_inconsistent(snapshot, "would reuse sequence number 2");

    let mut snapshot = rescaled_snapshot();
    snapshot.streams[0].shards[1].sequence_number_range.starting_sequence_number =
        "5".parse().unwrap();
    snapshot.streams[0].shards[1].sequence_number_range.ending_sequence_number =
        Some("7".parse().unwrap());
    assert_inconsistent(snapshot, "would reuse sequence number 7");
}

#[test]
fn test_snapshot_with_repeated_shard_id_is_rejected() {
    let mut snapshot = rescaled_snapshot();
    let first = snapshot.streams[0].shards[0].shard_id.clone();
    snapshot.streams[0].shards[1].shard_id = first;
    assert_inconsistent(snapshot, "repeats shard id `shardId-000000000000`");
}

#[test]
fn test_snapshot_with_unordered_shards_is_rejected() {
    let mut snapshot = rescaled_snapshot();
    snapshot.streams[0].shards.swap(0, 1);
    assert_inconsistent(snapshot, "out of id order");
}

#[test]
fn test_consistent_snapshot_keeps_shard_ids_unique_after_rescale() {
    let snapshot = rescaled_snapshot();
    let stream = snapshot.streams[0].stream_name.clone();
    let restored = Backend::from_snapshot(BackendConfig::default(), snapshot).unwrap();
    restored.update_shard_count(stream.clone(), 6).unwrap();

    let ids: Vec<_> = all_shards(&restored, &stream)
        .into_iter()
        .map(|shard| shard.shard_id)
        .collect();
    assert_eq!(ids.len(), 11);
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}
