use std::pin::Pin;

use futures::{Stream, TryStreamExt, stream};
use shardline_sdk::{
    Client,
    transport::Transport,
    types::{
        AccountLimits, AddTagsToStreamInput, CreateStreamInput, DeleteStreamInput,
        DescribeStreamInput, ListAllShardsInput, ListAllStreamsInput, ListAllTagsInput,
        ListStreamsInput, ListTagsForStreamInput, RemoveTagsFromStreamInput,
        RetentionPeriodInput, Shard, StreamDescription, StreamName, Tag, UpdateShardCountInput,
        UpdateShardCountOutput,
    },
};

use crate::{
    cli::{
        AddTagsArgs, CreateStreamArgs, DescribeStreamArgs, ListShardsArgs, ListStreamsArgs,
        ListTagsArgs, RemoveTagsArgs, RetentionArgs, UpdateShardCountArgs,
    },
    error::{CliError, OpKind},
};

type ItemStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T, CliError>> + Send + 'a>>;

pub async fn create_stream<T: Transport>(
    client: &Client<T>,
    args: CreateStreamArgs,
) -> Result<(), CliError> {
    let input = CreateStreamInput::new(args.stream).with_shard_count(args.shard_count);
    client
        .create_stream(input)
        .await
        .map_err(|e| CliError::op(OpKind::CreateStream, e))
}

pub async fn delete_stream<T: Transport>(
    client: &Client<T>,
    stream: StreamName,
) -> Result<(), CliError> {
    client
        .delete_stream(DeleteStreamInput::new(stream))
        .await
        .map_err(|e| CliError::op(OpKind::DeleteStream, e))
}

pub async fn describe_stream<T: Transport>(
    client: &Client<T>,
    args: DescribeStreamArgs,
) -> Result<StreamDescription, CliError> {
    let mut input = DescribeStreamInput::new(args.stream);
    if let Some(limit) = args.limit {
        input = input.with_limit(limit);
    }
    if let Some(start_after) = args.start_after {
        input = input.with_exclusive_start_shard_id(start_after);
    }
    client
        .describe_stream(input)
        .await
        .map_err(|e| CliError::op(OpKind::DescribeStream, e))
}

/// Every shard of a stream, oldest first.
pub async fn list_shards<T: Transport>(
    client: &Client<T>,
    args: ListShardsArgs,
    page_size: usize,
) -> Result<Vec<Shard>, CliError> {
    let mut input = ListAllShardsInput::new(args.stream).with_page_size(page_size);
    if let Some(start_after) = args.start_after {
        input = input.with_exclusive_start_shard_id(start_after);
    }
    let shards = client
        .list_all_shards(input)
        .collect_all()
        .await
        .map_err(|partial| CliError::aborted(OpKind::ListShards, partial.aborted))?;
    Ok(if args.open {
        shards.into_iter().filter(Shard::is_open).collect()
    } else {
        shards
    })
}

/// Open shards across the whole stream. A page that starts at the first
/// shard and has nothing after it is already complete.
pub async fn open_shard_count<T: Transport>(
    client: &Client<T>,
    description: &StreamDescription,
    from_start: bool,
    page_size: usize,
) -> Result<usize, CliError> {
    if from_start && !description.shards.has_more {
        return Ok(description
            .shards
            .values
            .iter()
            .filter(|shard| shard.is_open())
            .count());
    }
    let args = ListShardsArgs {
        stream: description.name.clone(),
        start_after: None,
        open: true,
    };
    Ok(list_shards(client, args, page_size).await?.len())
}

pub async fn list_streams<'a, T: Transport>(
    client: &'a Client<T>,
    args: ListStreamsArgs,
    page_size: usize,
) -> Result<ItemStream<'a, StreamName>, CliError> {
    let ListStreamsArgs {
        start_after,
        limit,
        no_auto_paginate,
    } = args;

    if no_auto_paginate {
        let mut input = ListStreamsInput::new();
        if let Some(s) = start_after {
            input = input.with_exclusive_start_stream_name(s);
        }
        if let Some(l) = limit {
            input = input.with_limit(l);
        }

        let page = client
            .list_streams(input)
            .await
            .map_err(|e| CliError::op(OpKind::ListStreams, e))?;

        Ok(Box::pin(stream::iter(page.values.into_iter().map(Ok))))
    } else {
        let mut input = ListAllStreamsInput::new().with_page_size(page_size);
        if let Some(s) = start_after {
            input = input.with_exclusive_start_stream_name(s);
        }
        if let Some(l) = limit {
            input = input.with_max_items(l);
        }

        let streams = client
            .list_all_streams(input)
            .into_stream()
            .map_err(|e| CliError::aborted(OpKind::ListStreams, e));

        Ok(Box::pin(streams))
    }
}

pub async fn increase_retention<T: Transport>(
    client: &Client<T>,
    args: RetentionArgs,
) -> Result<(), CliError> {
    client
        .increase_stream_retention_period(RetentionPeriodInput::increase(args.stream, args.hours))
        .await
        .map_err(|e| CliError::op(OpKind::IncreaseRetention, e))
}

pub async fn decrease_retention<T: Transport>(
    client: &Client<T>,
    args: RetentionArgs,
) -> Result<(), CliError> {
    client
        .decrease_stream_retention_period(RetentionPeriodInput::decrease(args.stream, args.hours))
        .await
        .map_err(|e| CliError::op(OpKind::DecreaseRetention, e))
}

pub async fn update_shard_count<T: Transport>(
    client: &Client<T>,
    args: UpdateShardCountArgs,
) -> Result<UpdateShardCountOutput, CliError> {
    client
        .update_shard_count(UpdateShardCountInput::new(
            args.stream,
            args.target_shard_count,
        ))
        .await
        .map_err(|e| CliError::op(OpKind::UpdateShardCount, e))
}

pub async fn add_tags<T: Transport>(client: &Client<T>, args: AddTagsArgs) -> Result<(), CliError> {
    let input = AddTagsToStreamInput::new(args.stream)
        .with_tags(args.tags.into_iter().map(Tag::from));
    client
        .add_tags_to_stream(input)
        .await
        .map_err(|e| CliError::op(OpKind::AddTags, e))
}

pub async fn remove_tags<T: Transport>(
    client: &Client<T>,
    args: RemoveTagsArgs,
) -> Result<(), CliError> {
    let input = RemoveTagsFromStreamInput::new(args.stream).with_tag_keys(args.keys);
    client
        .remove_tags_from_stream(input)
        .await
        .map_err(|e| CliError::op(OpKind::RemoveTags, e))
}

pub async fn list_tags<'a, T: Transport>(
    client: &'a Client<T>,
    args: ListTagsArgs,
    page_size: usize,
) -> Result<ItemStream<'a, Tag>, CliError> {
    let ListTagsArgs {
        stream: stream_name,
        start_after,
        limit,
        no_auto_paginate,
    } = args;

    if no_auto_paginate {
        let mut input = ListTagsForStreamInput::new(stream_name);
        if let Some(s) = start_after {
            input = input.with_exclusive_start_tag_key(s);
        }
        if let Some(l) = limit {
            input = input.with_limit(l);
        }

        let page = client
            .list_tags_for_stream(input)
            .await
            .map_err(|e| CliError::op(OpKind::ListTags, e))?;

        Ok(Box::pin(stream::iter(page.values.into_iter().map(Ok))))
    } else {
        let mut input = ListAllTagsInput::new(stream_name).with_page_size(page_size);
        if let Some(s) = start_after {
            input = input.with_exclusive_start_tag_key(s);
        }
        if let Some(l) = limit {
            input = input.with_max_items(l);
        }

        let tags = client
            .list_all_tags(input)
            .into_stream()
            .map_err(|e| CliError::aborted(OpKind::ListTags, e));

        Ok(Box::pin(tags))
    }
}

pub async fn describe_limits<T: Transport>(client: &Client<T>) -> Result<AccountLimits, CliError> {
    client
        .describe_limits()
        .await
        .map_err(|e| CliError::op(OpKind::DescribeLimits, e))
}

/// Drains a listing, keeping the first error.
pub async fn collect<T>(items: ItemStream<'_, T>) -> Result<Vec<T>, CliError> {
    items.try_collect().await
}

#[cfg(test)]
mod tests {
    use shardline_lite::{backend::Backend, handlers::v1::LiteTransport};

    use super::*;

    fn client() -> Client<LiteTransport> {
        Client::new(LiteTransport::new(Backend::new(Default::default())))
    }

    fn name(s: &str) -> StreamName {
        s.parse().expect("valid name")
    }

    async fn create(client: &Client<LiteTransport>, stream: &str, shard_count: u32) {
        create_stream(
            client,
            CreateStreamArgs {
                stream: name(stream),
                shard_count,
            },
        )
        .await
        .expect("create");
    }

    #[tokio::test]
    async fn limit_caps_auto_pagination() {
        let client = client();
        for stream in ["a", "b", "c", "d", "e"] {
            create(&client, stream, 1).await;
        }
        let args = ListStreamsArgs {
            start_after: Some("a".parse().expect("cursor")),
            limit: Some(3),
            no_auto_paginate: false,
        };
        let names: Vec<_> = list_streams(&client, args, 2)
            .await
            .expect("listing")
            .try_collect()
            .await
            .expect("streams");
        assert_eq!(names, vec![name("b"), name("c"), name("d")]);
    }

    #[tokio::test]
    async fn single_page_reports_only_that_page() {
        let client = client();
        for stream in ["a", "b", "c"] {
            create(&client, stream, 1).await;
        }
        let args = ListStreamsArgs {
            start_after: None,
            limit: Some(2),
            no_auto_paginate: true,
        };
        let names = collect(list_streams(&client, args, 100).await.expect("listing"))
            .await
            .expect("streams");
        assert_eq!(names, vec![name("a"), name("b")]);
    }

    #[tokio::test]
    async fn open_filter_drops_closed_parents() {
        let client = client();
        create(&client, "orders", 2).await;
        update_shard_count(
            &client,
            UpdateShardCountArgs {
                stream: name("orders"),
                target_shard_count: 3,
            },
        )
        .await
        .expect("rescale");

        let args = |open| ListShardsArgs {
            stream: name("orders"),
            start_after: None,
            open,
        };
        assert_eq!(list_shards(&client, args(false), 1).await.expect("all").len(), 5);
        let open = list_shards(&client, args(true), 1).await.expect("open");
        assert_eq!(open.len(), 3);
        assert!(open.iter().all(Shard::is_open));
    }

    #[tokio::test]
    async fn open_shard_count_spans_every_page() {
        let client = client();
        create(&client, "orders", 4).await;
        update_shard_count(
            &client,
            UpdateShardCountArgs {
                stream: name("orders"),
                target_shard_count: 6,
            },
        )
        .await
        .expect("rescale");

        // The first page holds only closed parents.
        let description = describe_stream(
            &client,
            DescribeStreamArgs {
                stream: name("orders"),
                limit: Some(4),
                start_after: None,
            },
        )
        .await
        .expect("describe");
        assert!(description.shards.has_more);
        assert!(description.shards.values.iter().all(|shard| !shard.is_open()));
        assert_eq!(
            open_shard_count(&client, &description, true, 2)
                .await
                .expect("count"),
            6
        );

        let complete = describe_stream(
            &client,
            DescribeStreamArgs {
                stream: name("orders"),
                limit: None,
                start_after: None,
            },
        )
        .await
        .expect("describe");
        assert_eq!(
            open_shard_count(&client, &complete, true, 2)
                .await
                .expect("count"),
            6
        );
    }

    #[tokio::test]
    async fn invalid_retention_is_a_validation_error() {
        let client = client();
        let err = decrease_retention(
            &client,
            RetentionArgs {
                stream: name("orders"),
                hours: 12,
            },
        )
        .await
        .expect_err("below the decrease floor");
        assert!(matches!(
            err,
            CliError::Validation(OpKind::DecreaseRetention, _)
        ));
    }

    #[tokio::test]
    async fn listing_tags_of_missing_stream_fails_on_first_page() {
        let client = client();
        let args = ListTagsArgs {
            stream: name("missing"),
            start_after: None,
            limit: None,
            no_auto_paginate: false,
        };
        let err = collect(list_tags(&client, args, 10).await.expect("listing"))
            .await
            .expect_err("missing stream");
        assert!(matches!(err, CliError::Operation(OpKind::ListTags, _)));
    }
}
