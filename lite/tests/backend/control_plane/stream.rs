use proptest::prelude::*;
use rstest::rstest;
use shardline_common::types::{
    shard::{HashKey, Shard, ShardId},
    stream::{RetentionChange, StreamStatus},
};
use shardline_lite::backend::error::{
    CreateStreamError, DeleteStreamError, DescribeStreamError, ListStreamsError,
    UpdateRetentionError, UpdateShardCountError,
};

use crate::common::*;

#[test]
fn test_create_describe_delete_lifecycle() {
    let backend = create_backend();
    let stream = test_stream_name("lifecycle");

    backend
        .create_stream(stream.clone(), 3)
        .expect("Failed to create stream");

    let description = backend
        .describe_stream(stream.clone(), None, None)
        .expect("Failed to describe stream");
    assert_eq!(description.name, stream);
    assert_eq!(description.status, StreamStatus::Active);
    assert_eq!(description.retention_period_hours, 24);
    assert_eq!(description.shards.values.len(), 3);
    assert!(!description.shards.has_more);
    Shard::check_open_coverage(&description.shards.values).expect("full coverage");

    backend
        .delete_stream(stream.clone())
        .expect("Failed to delete stream");
    assert!(matches!(
        backend.describe_stream(stream, None, None),
        Err(DescribeStreamError::StreamNotFound(_))
    ));
}

#[test]
fn test_create_existing_stream_is_in_use() {
    let backend = create_backend();
    let stream = test_stream_name("dup");
    backend.create_stream(stream.clone(), 1).unwrap();

    let result = backend.create_stream(stream, 1);
    assert!(matches!(
        result,
        Err(CreateStreamError::StreamAlreadyExists(_))
    ));
}

#[test]
fn test_delete_missing_stream() {
    let backend = create_backend();
    assert!(matches!(
        backend.delete_stream(test_stream_name("missing")),
        Err(DeleteStreamError::StreamNotFound(_))
    ));
}

#[rstest]
#[case(0)]
#[case(100_001)]
fn test_create_rejects_shard_count(#[case] shard_count: u32) {
    let backend = create_backend();
    assert!(matches!(
        backend.create_stream(test_stream_name("count"), shard_count),
        Err(CreateStreamError::Validation(e)) if e.field == "ShardCount"
    ));
}

#[test]
fn test_create_respects_shard_limit() {
    let backend = create_backend_with_shard_limit(4);
    backend.create_stream(test_stream_name("a"), 3).unwrap();

    let result = backend.create_stream(test_stream_name("b"), 2);
    assert!(matches!(
        result,
        Err(CreateStreamError::ShardLimitExceeded(e)) if e.limit == 4 && e.requested == 5
    ));
    backend.create_stream(test_stream_name("b"), 1).unwrap();
    assert_eq!(backend.describe_limits().open_shard_count, 4);
    assert_eq!(backend.describe_limits().available(), 0);
}

#[test]
fn test_list_streams_pages_in_name_order() {
    let backend = create_backend();
    for suffix in ["c", "a", "e", "b", "d"] {
        backend.create_stream(test_stream_name(suffix), 1).unwrap();
    }

    let first = backend.list_streams(Some(2), None).unwrap();
    assert_eq!(
        first.values,
        vec![test_stream_name("a"), test_stream_name("b")]
    );
    assert!(first.has_more);

    let rest = backend
        .list_streams(Some(10), Some(test_stream_name("b").into()))
        .unwrap();
    assert_eq!(
        rest.values,
        vec![
            test_stream_name("c"),
            test_stream_name("d"),
            test_stream_name("e")
        ]
    );
    assert!(!rest.has_more);
}

#[test]
fn test_list_streams_limit_bounds() {
    let backend = create_backend();
    assert!(matches!(
        backend.list_streams(Some(0), None),
        Err(ListStreamsError::Validation(_))
    ));
    assert!(backend.list_streams(Some(10_000), None).is_ok());
    assert!(backend.list_streams(None, None).unwrap().values.is_empty());
}

#[rstest]
#[case::increase(RetentionChange::Increase, 48, true)]
#[case::increase_to_same(RetentionChange::Increase, 24, false)]
#[case::decrease_from_default(RetentionChange::Decrease, 24, false)]
#[case::increase_out_of_range(RetentionChange::Increase, 169, false)]
fn test_retention_from_default(
    #[case] change: RetentionChange,
    #[case] hours: u32,
    #[case] ok: bool,
) {
    let backend = create_backend();
    let stream = test_stream_name("retention");
    backend.create_stream(stream.clone(), 1).unwrap();

    let result = backend.update_retention_period(stream.clone(), change, hours);
    assert_eq!(result.is_ok(), ok, "{result:?}");

    let expected = if ok { hours } else { 24 };
    let description = backend.describe_stream(stream, None, None).unwrap();
    assert_eq!(description.retention_period_hours, expected);
}

#[test]
fn test_retention_round_trip() {
    let backend = create_backend();
    let stream = test_stream_name("retention-round-trip");
    backend.create_stream(stream.clone(), 1).unwrap();

    backend
        .update_retention_period(stream.clone(), RetentionChange::Increase, 168)
        .unwrap();
    let wrong_way = backend.update_retention_period(stream.clone(), RetentionChange::Increase, 72);
    assert!(matches!(
        wrong_way,
        Err(UpdateRetentionError::RetentionDirection(e)) if e.current == 168 && e.requested == 72
    ));
    backend
        .update_retention_period(stream.clone(), RetentionChange::Decrease, 72)
        .unwrap();
    assert!(matches!(
        backend.update_retention_period(stream, RetentionChange::Decrease, 10),
        Err(UpdateRetentionError::Validation(e)) if e.field == "RetentionPeriodHours"
    ));
}

#[test]
fn test_uniform_scale_up_records_parents() {
    let backend = create_backend();
    let stream = test_stream_name("scale-up");
    backend.create_stream(stream.clone(), 2).unwrap();

    let previous = backend.update_shard_count(stream.clone(), 4).unwrap();
    assert_eq!(previous, 2);

    let shards = all_shards(&backend, &stream);
    assert_eq!(shards.len(), 6);

    let (closed, open): (Vec<_>, Vec<_>) = shards.iter().partition(|s| !s.is_open());
    assert_eq!(closed.len(), 2);
    assert_eq!(open.len(), 4);
    Shard::check_open_coverage(&shards).expect("open shards cover the key space");

    for shard in &closed {
        let range = &shard.sequence_number_range;
        assert!(range.ending().unwrap() >= range.starting());
    }
    for shard in &open {
        let parent = shard.parent_shard_id.as_ref().expect("parent recorded");
        assert!(closed.iter().any(|c| &c.shard_id == parent));
        assert_ne!(shard.adjacent_parent_shard_id.as_ref(), Some(parent));
        assert!(
            shard.sequence_number_range.starting() > closed[0].sequence_number_range.ending().unwrap()
        );
    }

    let ids: Vec<_> = shards.iter().map(|s| s.shard_id.clone()).collect();
    let expected: Vec<_> = (0..6).map(ShardId::from_index).collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_uniform_scale_down_records_adjacent_parent() {
    let backend = create_backend();
    let stream = test_stream_name("scale-down");
    backend.create_stream(stream.clone(), 2).unwrap();
    backend.update_shard_count(stream.clone(), 1).unwrap();

    let shards = all_shards(&backend, &stream);
    let merged = shards.iter().find(|s| s.is_open()).unwrap();
    assert_eq!(merged.hash_key_range.starting(), HashKey::MIN);
    assert_eq!(merged.hash_key_range.ending(), HashKey::MAX);
    assert_eq!(merged.parent_shard_id, Some(ShardId::from_index(0)));
    assert_eq!(merged.adjacent_parent_shard_id, Some(ShardId::from_index(1)));
}

#[rstest]
#[case::more_than_double(2, 5)]
#[case::less_than_half(5, 2)]
fn test_scaling_bounds(#[case] current: u32, #[case] target: u32) {
    let backend = create_backend();
    let stream = test_stream_name("bounds");
    backend.create_stream(stream.clone(), current).unwrap();
    assert!(matches!(
        backend.update_shard_count(stream, target),
        Err(UpdateShardCountError::ScalingOutOfBounds(_))
    ));
}

#[test]
fn test_scaling_respects_shard_limit() {
    let backend = create_backend_with_shard_limit(3);
    let stream = test_stream_name("limit");
    backend.create_stream(stream.clone(), 2).unwrap();
    assert!(matches!(
        backend.update_shard_count(stream.clone(), 4),
        Err(UpdateShardCountError::ShardLimitExceeded(_))
    ));
    backend.update_shard_count(stream, 3).unwrap();
}

#[test]
fn test_scaling_to_current_count_is_a_no_op() {
    let backend = create_backend();
    let stream = test_stream_name("same");
    backend.create_stream(stream.clone(), 2).unwrap();
    assert_eq!(backend.update_shard_count(stream.clone(), 2).unwrap(), 2);
    assert_eq!(all_shards(&backend, &stream).len(), 2);
}

#[test]
fn test_describe_pages_shards_by_id() {
    let backend = create_backend();
    let stream = test_stream_name("paged");
    backend.create_stream(stream.clone(), 5).unwrap();

    let first = backend.describe_stream(stream.clone(), Some(2), None).unwrap();
    assert!(first.shards.has_more);
    let last_id = first.shards.values.last().unwrap().shard_id.clone();
    assert_eq!(last_id, ShardId::from_index(1));

    let rest = backend
        .describe_stream(stream, Some(10), Some(last_id.into()))
        .unwrap();
    assert!(!rest.shards.has_more);
    let ids: Vec<_> = rest.shards.values.iter().map(|s| s.shard_id.clone()).collect();
    assert_eq!(ids, (2..5).map(ShardId::from_index).collect::<Vec<_>>());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_rescaling_keeps_coverage(steps in prop::collection::vec(0.5f64..2.0, 1..6)) {
        let backend = create_backend();
        let stream = test_stream_name("rescale");
        backend.create_stream(stream.clone(), 4).unwrap();

        let mut current = 4u32;
        for factor in steps {
            let target = ((f64::from(current) * factor).round() as u32)
                .clamp(current.div_ceil(2), current * 2)
                .max(1);
            backend.update_shard_count(stream.clone(), target).unwrap();
            current = target;

            let shards = all_shards(&backend, &stream);
            prop_assert_eq!(shards.iter().filter(|s| s.is_open()).count() as u32, current);
            prop_assert!(Shard::check_open_coverage(&shards).is_ok());
        }
    }
}
