use futures::TryStreamExt;
use rstest::rstest;
use serde_json::json;
use shardline_api::v1::{Operation, error::ErrorCode};
use shardline_common::types::stream::StreamStatus;
use shardline_lite::handlers::v1::LiteTransport;
use shardline_sdk::{
    error::SdkError,
    transport::Transport,
    types::{
        AddTagsToStreamInput, CreateStreamInput, DeleteStreamInput, DescribeStreamInput,
        ListAllShardsInput, ListAllStreamsInput, ListAllTagsInput, RetentionPeriodInput,
        UpdateShardCountInput,
    },
};

use crate::common::*;

#[rstest]
#[case(1)]
#[case(3)]
#[case(7)]
#[case(100)]
#[tokio::test]
async fn test_listing_across_pages_matches_full_listing(#[case] page_size: usize) {
    let backend = create_backend();
    let client = create_client(&backend);
    for i in 0..23 {
        client
            .create_stream(CreateStreamInput::new(test_stream_name(&format!("{i:02}"))))
            .await
            .unwrap();
    }

    let listed = client
        .list_all_streams(ListAllStreamsInput::new().with_page_size(page_size))
        .collect_all()
        .await
        .unwrap();
    let expected = backend.list_streams(Some(10_000), None).unwrap().values;
    assert_eq!(listed.len(), 23);
    assert_eq!(listed, expected);
}

#[tokio::test]
async fn test_shard_listing_after_rescale() {
    let backend = create_backend();
    let client = create_client(&backend);
    let stream = test_stream_name("sdk-shards");

    client
        .create_stream(CreateStreamInput::new(stream.clone()).with_shard_count(4))
        .await
        .unwrap();
    let output = client
        .update_shard_count(UpdateShardCountInput::new(stream.clone(), 8))
        .await
        .unwrap();
    assert_eq!(output.current_shard_count, 4);
    assert_eq!(output.target_shard_count, 8);

    let shards: Vec<_> = client
        .list_all_shards(ListAllShardsInput::new(stream.clone()).with_page_size(3))
        .into_stream()
        .try_collect()
        .await
        .unwrap();
    assert_eq!(shards.len(), 12);
    assert_eq!(shards.iter().filter(|s| s.is_open()).count(), 8);

    let limits = client.describe_limits().await.unwrap();
    assert_eq!(limits.open_shard_count, 8);

    let description = client
        .describe_stream(DescribeStreamInput::new(stream).with_limit(1))
        .await
        .unwrap();
    assert_eq!(description.status, StreamStatus::Active);
    assert!(description.shards.has_more);
}

#[tokio::test]
async fn test_tags_round_trip() {
    let backend = create_backend();
    let client = create_client(&backend);
    let stream = test_stream_name("sdk-tags");
    client
        .create_stream(CreateStreamInput::new(stream.clone()))
        .await
        .unwrap();

    for batch in 0..3 {
        let input = (0..10).fold(AddTagsToStreamInput::new(stream.clone()), |input, i| {
            let (key, value) = tag(&format!("key-{batch}-{i}"), "value");
            input.with_tag(key, value)
        });
        client.add_tags_to_stream(input).await.unwrap();
    }

    let tags = client
        .list_all_tags(ListAllTagsInput::new(stream).with_page_size(50))
        .collect_all()
        .await
        .unwrap();
    assert_eq!(tags.len(), 30);
    assert!(tags.windows(2).all(|w| w[0].key < w[1].key));
}

#[tokio::test]
async fn test_service_errors_map_to_codes() {
    let backend = create_backend();
    let client = create_client(&backend);
    let stream = test_stream_name("sdk-errors");

    let missing = client
        .delete_stream(DeleteStreamInput::new(stream.clone()))
        .await
        .unwrap_err();
    assert_eq!(missing.code(), Some(ErrorCode::ResourceNotFound));

    client
        .create_stream(CreateStreamInput::new(stream.clone()))
        .await
        .unwrap();
    let in_use = client
        .create_stream(CreateStreamInput::new(stream.clone()))
        .await
        .unwrap_err();
    assert_eq!(in_use.code(), Some(ErrorCode::ResourceInUse));

    // Passes local validation, but 24 is not below the current retention.
    let wrong_way = client
        .decrease_stream_retention_period(RetentionPeriodInput::decrease(stream, 24))
        .await
        .unwrap_err();
    assert!(matches!(
        wrong_way,
        SdkError::Transport { operation: Operation::DecreaseStreamRetentionPeriod, ref source }
            if source.code == ErrorCode::InvalidArgument
    ));
}

#[tokio::test]
async fn test_transport_rejects_bad_bodies() {
    let transport = LiteTransport::new(create_backend());

    let malformed = transport
        .execute(Operation::CreateStream, json!({"StreamName": "bad name!", "ShardCount": 1}))
        .await
        .unwrap_err();
    assert_eq!(malformed.code, ErrorCode::InvalidArgument);
    assert!(malformed.message.contains("StreamName"), "{malformed}");

    let wrong_shape = transport
        .execute(Operation::ListStreams, json!("nope"))
        .await
        .unwrap_err();
    assert_eq!(wrong_shape.code, ErrorCode::InvalidArgument);
}
