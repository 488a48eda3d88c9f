use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use shardline_api::v1::{self, Operation, stream as v1s, tag as v1t};
use shardline_common::caps;
use tracing::{debug, instrument};

use crate::{
    error::SdkError,
    pagination::{PageSource, Paginator},
    transport::Transport,
    types::{
        AccountLimits, AddTagsToStreamInput, CreateStreamInput, DeleteStreamInput,
        DescribeStreamInput, ExclusiveStartShardId, ExclusiveStartStreamName,
        ExclusiveStartTagKey, ListAllShardsInput, ListAllStreamsInput, ListAllTagsInput,
        ListLimit, ListStreamsInput, ListTagsForStreamInput, Page, PaginationInput,
        RemoveTagsFromStreamInput, RetentionChange, RetentionPeriodInput, Shard,
        StreamDescription, StreamName, Tag, UpdateShardCountInput, UpdateShardCountOutput,
        Validate,
    },
};

/// Entry point for every operation.
///
/// Each call validates its input, serializes it, hands it to the transport
/// and decodes the response. Failed validation never reaches the transport.
#[derive(Debug, Clone)]
pub struct Client<T> {
    transport: T,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[instrument(level = "debug", skip_all, fields(%operation))]
    async fn send<Req: Serialize>(
        &self,
        operation: Operation,
        request: &Req,
    ) -> Result<serde_json::Value, SdkError> {
        let body = serde_json::to_value(request)
            .map_err(|source| SdkError::Marshal { operation, source })?;
        let response = self
            .transport
            .execute(operation, body)
            .await
            .map_err(|source| SdkError::Transport { operation, source })?;
        debug!("response received");
        Ok(response)
    }

    async fn call<Req: Serialize, Res: DeserializeOwned>(
        &self,
        operation: Operation,
        request: &Req,
    ) -> Result<Res, SdkError> {
        let response = self.send(operation, request).await?;
        serde_json::from_value(response)
            .map_err(|source| SdkError::Unmarshal { operation, source })
    }

    pub async fn create_stream(&self, input: CreateStreamInput) -> Result<(), SdkError> {
        let request = v1s::CreateStreamRequest::from(input.validated()?.into_inner());
        self.send(Operation::CreateStream, &request).await?;
        Ok(())
    }

    pub async fn delete_stream(&self, input: DeleteStreamInput) -> Result<(), SdkError> {
        let request = v1s::DeleteStreamRequest::from(input.validated()?.into_inner());
        self.send(Operation::DeleteStream, &request).await?;
        Ok(())
    }

    /// One page of a stream's shards along with its metadata.
    pub async fn describe_stream(
        &self,
        input: DescribeStreamInput,
    ) -> Result<StreamDescription, SdkError> {
        const OPERATION: Operation = Operation::DescribeStream;
        let request = v1s::DescribeStreamRequest::from(input.validated()?.into_inner());
        let response: v1s::DescribeStreamResponse = self.call(OPERATION, &request).await?;
        response
            .stream_description
            .try_into()
            .map_err(|source| SdkError::InvalidResponse {
                operation: OPERATION,
                source,
            })
    }

    pub async fn list_streams(
        &self,
        input: ListStreamsInput,
    ) -> Result<Page<StreamName>, SdkError> {
        let request = v1s::ListStreamsRequest::from(input.validated()?.into_inner());
        let response: v1s::ListStreamsResponse =
            self.call(Operation::ListStreams, &request).await?;
        Ok(response.into())
    }

    pub async fn increase_stream_retention_period(
        &self,
        input: RetentionPeriodInput,
    ) -> Result<(), SdkError> {
        let input = RetentionPeriodInput {
            change: RetentionChange::Increase,
            ..input
        };
        self.change_retention(Operation::IncreaseStreamRetentionPeriod, input)
            .await
    }

    pub async fn decrease_stream_retention_period(
        &self,
        input: RetentionPeriodInput,
    ) -> Result<(), SdkError> {
        let input = RetentionPeriodInput {
            change: RetentionChange::Decrease,
            ..input
        };
        self.change_retention(Operation::DecreaseStreamRetentionPeriod, input)
            .await
    }

    async fn change_retention(
        &self,
        operation: Operation,
        input: RetentionPeriodInput,
    ) -> Result<(), SdkError> {
        let request = v1s::RetentionPeriodRequest::from(input.validated()?.into_inner());
        self.send(operation, &request).await?;
        Ok(())
    }

    pub async fn update_shard_count(
        &self,
        input: UpdateShardCountInput,
    ) -> Result<UpdateShardCountOutput, SdkError> {
        let request = v1s::UpdateShardCountRequest::from(input.validated()?.into_inner());
        let response: v1s::UpdateShardCountResponse =
            self.call(Operation::UpdateShardCount, &request).await?;
        Ok(response.into())
    }

    pub async fn add_tags_to_stream(&self, input: AddTagsToStreamInput) -> Result<(), SdkError> {
        let request = v1t::AddTagsToStreamRequest::from(input.validated()?.into_inner());
        self.send(Operation::AddTagsToStream, &request).await?;
        Ok(())
    }

    pub async fn remove_tags_from_stream(
        &self,
        input: RemoveTagsFromStreamInput,
    ) -> Result<(), SdkError> {
        let request = v1t::RemoveTagsFromStreamRequest::from(input.validated()?.into_inner());
        self.send(Operation::RemoveTagsFromStream, &request).await?;
        Ok(())
    }

    pub async fn list_tags_for_stream(
        &self,
        input: ListTagsForStreamInput,
    ) -> Result<Page<Tag>, SdkError> {
        let request = v1t::ListTagsForStreamRequest::from(input.validated()?.into_inner());
        let response: v1t::ListTagsForStreamResponse =
            self.call(Operation::ListTagsForStream, &request).await?;
        Ok(response.into())
    }

    pub async fn describe_limits(&self) -> Result<AccountLimits, SdkError> {
        let response: v1::account::DescribeLimitsResponse =
            self.call(Operation::DescribeLimits, &v1::Empty {}).await?;
        Ok(response.into())
    }

    /// Every stream name, following `ExclusiveStartStreamName` across pages.
    pub fn list_all_streams(
        &self,
        input: ListAllStreamsInput,
    ) -> Paginator<ListStreamsSource<'_, T>> {
        paginate(ListStreamsSource { client: self }, input.pagination)
    }

    /// Every shard of a stream, following `ExclusiveStartShardId` across pages.
    pub fn list_all_shards(
        &self,
        input: ListAllShardsInput,
    ) -> Paginator<DescribeStreamSource<'_, T>> {
        let source = DescribeStreamSource {
            client: self,
            stream_name: input.stream_name,
        };
        paginate(source, input.pagination)
    }

    /// Every tag of a stream, following `ExclusiveStartTagKey` across pages.
    pub fn list_all_tags(
        &self,
        input: ListAllTagsInput,
    ) -> Paginator<ListTagsSource<'_, T>> {
        let source = ListTagsSource {
            client: self,
            stream_name: input.stream_name,
        };
        paginate(source, input.pagination)
    }
}

fn paginate<S: PageSource>(source: S, input: PaginationInput<S::Cursor>) -> Paginator<S> {
    let mut paginator = Paginator::new(source).with_page_size(input.page_size);
    if let Some(max_items) = input.max_items {
        paginator = paginator.with_max_items(max_items);
    }
    if let Some(cursor) = input.exclusive_start {
        paginator = paginator.resume_after(cursor);
    }
    paginator
}

pub struct ListStreamsSource<'a, T> {
    client: &'a Client<T>,
}

#[async_trait]
impl<'a, T: Transport> PageSource for ListStreamsSource<'a, T> {
    type Item = StreamName;
    type Cursor = ExclusiveStartStreamName;

    const OPERATION: Operation = Operation::ListStreams;
    const MAX_LIMIT: usize = caps::MAX_LIST_STREAMS_LIMIT;

    async fn fetch_page(
        &self,
        exclusive_start: Option<Self::Cursor>,
        limit: ListLimit,
    ) -> Result<Page<Self::Item>, SdkError> {
        let input = ListStreamsInput {
            limit: Some(limit.as_usize()),
            exclusive_start_stream_name: exclusive_start,
        };
        self.client.list_streams(input).await
    }

    fn cursor(item: &Self::Item) -> Self::Cursor {
        item.clone().into()
    }
}

pub struct DescribeStreamSource<'a, T> {
    client: &'a Client<T>,
    stream_name: StreamName,
}

#[async_trait]
impl<'a, T: Transport> PageSource for DescribeStreamSource<'a, T> {
    type Item = Shard;
    type Cursor = ExclusiveStartShardId;

    const OPERATION: Operation = Operation::DescribeStream;
    const MAX_LIMIT: usize = caps::MAX_DESCRIBE_STREAM_LIMIT;

    async fn fetch_page(
        &self,
        exclusive_start: Option<Self::Cursor>,
        limit: ListLimit,
    ) -> Result<Page<Self::Item>, SdkError> {
        let input = DescribeStreamInput {
            stream_name: self.stream_name.clone(),
            limit: Some(limit.as_usize()),
            exclusive_start_shard_id: exclusive_start,
        };
        Ok(self.client.describe_stream(input).await?.shards)
    }

    fn cursor(item: &Self::Item) -> Self::Cursor {
        item.shard_id.clone().into()
    }
}

pub struct ListTagsSource<'a, T> {
    client: &'a Client<T>,
    stream_name: StreamName,
}

#[async_trait]
impl<'a, T: Transport> PageSource for ListTagsSource<'a, T> {
    type Item = Tag;
    type Cursor = ExclusiveStartTagKey;

    const OPERATION: Operation = Operation::ListTagsForStream;
    const MAX_LIMIT: usize = caps::MAX_LIST_TAGS_LIMIT;

    async fn fetch_page(
        &self,
        exclusive_start: Option<Self::Cursor>,
        limit: ListLimit,
    ) -> Result<Page<Self::Item>, SdkError> {
        let input = ListTagsForStreamInput {
            stream_name: self.stream_name.clone(),
            exclusive_start_tag_key: exclusive_start,
            limit: Some(limit.as_usize()),
        };
        self.client.list_tags_for_stream(input).await
    }

    fn cursor(item: &Self::Item) -> Self::Cursor {
        item.key.clone().into()
    }
}
