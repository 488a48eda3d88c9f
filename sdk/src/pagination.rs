//! Cursor-following pagination over list operations.
//!
//! A [`Paginator`] issues one request per page, passing the identifier of the
//! last item it received as the exclusive-start cursor of the next request,
//! and stops once the service reports no further results.

use std::fmt;

use async_trait::async_trait;
use futures::Stream;
use shardline_api::v1::Operation;
use shardline_common::types::resources::{ListLimit, Page};
use tracing::{debug, warn};

use crate::error::{PaginationAborted, PartialListing, SdkError};

/// A list operation that can be fetched one page at a time.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Send;
    type Cursor: Clone + fmt::Debug + Send + Sync;

    const OPERATION: Operation;
    const MAX_LIMIT: usize;

    async fn fetch_page(
        &self,
        exclusive_start: Option<Self::Cursor>,
        limit: ListLimit,
    ) -> Result<Page<Self::Item>, SdkError>;

    /// Cursor that makes the next page start right after `item`.
    fn cursor(item: &Self::Item) -> Self::Cursor;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum PaginatorState {
    NotStarted,
    FetchingPage,
    HasPage,
    Exhausted,
    Failed,
}

impl PaginatorState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Exhausted | Self::Failed)
    }
}

/// Forward-only iteration over every item of a listing.
///
/// Nothing is fetched until the first call to [`next_page`](Self::next_page).
/// A paginator cannot be rewound; restarting means building a new one.
pub struct Paginator<S: PageSource> {
    source: S,
    limit: ListLimit,
    max_items: Option<usize>,
    cursor: Option<S::Cursor>,
    state: PaginatorState,
    retrieved: usize,
}

impl<S: PageSource> Paginator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            limit: ListLimit::capped(0, S::MAX_LIMIT),
            max_items: None,
            cursor: None,
            state: PaginatorState::NotStarted,
            retrieved: 0,
        }
    }

    /// Items requested per call. Zero selects the default and values above
    /// the operation maximum are capped.
    pub fn with_page_size(self, page_size: usize) -> Self {
        Self {
            limit: ListLimit::capped(page_size, S::MAX_LIMIT),
            ..self
        }
    }

    /// Stop after `max_items` items in total, without fetching further pages.
    pub fn with_max_items(self, max_items: usize) -> Self {
        Self {
            max_items: Some(max_items),
            ..self
        }
    }

    /// Start the listing after `cursor` instead of at the beginning.
    pub fn resume_after(self, cursor: impl Into<S::Cursor>) -> Self {
        Self {
            cursor: Some(cursor.into()),
            ..self
        }
    }

    pub fn state(&self) -> PaginatorState {
        self.state
    }

    /// Number of items handed out so far.
    pub fn retrieved(&self) -> usize {
        self.retrieved
    }

    /// Exclusive-start cursor the next request would carry.
    pub fn cursor(&self) -> Option<&S::Cursor> {
        self.cursor.as_ref()
    }

    pub fn page_size(&self) -> ListLimit {
        self.limit
    }

    /// Fetches the next page.
    ///
    /// Returns `Ok(None)` once the listing is exhausted. After an error the
    /// paginator is failed and every later call returns `Ok(None)`.
    pub async fn next_page(
        &mut self,
    ) -> Result<Option<Vec<S::Item>>, PaginationAborted<S::Cursor>> {
        if self.state.is_terminal() {
            return Ok(None);
        }

        let remaining = self.max_items.map(|max| max.saturating_sub(self.retrieved));
        if remaining == Some(0) {
            self.state = PaginatorState::Exhausted;
            return Ok(None);
        }
        let limit = match remaining {
            Some(remaining) if remaining < self.limit.as_usize() => {
                ListLimit::capped(remaining, S::MAX_LIMIT)
            }
            _ => self.limit,
        };

        self.state = PaginatorState::FetchingPage;
        debug!(
            operation = %S::OPERATION,
            cursor = ?self.cursor,
            limit = limit.as_usize(),
            "fetching page"
        );
        let Page {
            mut values,
            has_more,
        } = match self.source.fetch_page(self.cursor.clone(), limit).await {
            Ok(page) => page,
            Err(source) => return Err(self.abort(source)),
        };

        if has_more && values.is_empty() {
            return Err(self.abort(SdkError::StalledPagination {
                operation: S::OPERATION,
            }));
        }
        if let Some(remaining) = remaining {
            values.truncate(remaining);
        }
        if let Some(last) = values.last() {
            self.cursor = Some(S::cursor(last));
        }
        self.retrieved += values.len();

        let capped = self.max_items.is_some_and(|max| self.retrieved >= max);
        self.state = if has_more && !capped {
            PaginatorState::HasPage
        } else {
            PaginatorState::Exhausted
        };
        debug!(
            operation = %S::OPERATION,
            items = values.len(),
            retrieved = self.retrieved,
            state = %self.state,
            "page received"
        );

        if values.is_empty() {
            Ok(None)
        } else {
            Ok(Some(values))
        }
    }

    fn abort(&mut self, source: SdkError) -> PaginationAborted<S::Cursor> {
        self.state = PaginatorState::Failed;
        warn!(
            operation = %S::OPERATION,
            retrieved = self.retrieved,
            resume_after = ?self.cursor,
            error = %source,
            "listing aborted"
        );
        PaginationAborted {
            retrieved: self.retrieved,
            resume_after: self.cursor.clone(),
            source,
        }
    }

    /// Drains the listing, keeping whatever was gathered if a page fails.
    pub async fn collect_all(
        mut self,
    ) -> Result<Vec<S::Item>, PartialListing<S::Item, S::Cursor>> {
        let mut items = Vec::new();
        loop {
            match self.next_page().await {
                Ok(Some(page)) => items.extend(page),
                Ok(None) => return Ok(items),
                Err(aborted) => return Err(PartialListing { items, aborted }),
            }
        }
    }

    /// Item-by-item view of the listing. Pages are fetched lazily as the
    /// stream is polled, and the stream ends after yielding an error.
    pub fn into_stream(
        self,
    ) -> impl Stream<Item = Result<S::Item, PaginationAborted<S::Cursor>>> + Send {
        async_stream::try_stream! {
            let mut paginator = self;
            while let Some(page) = paginator.next_page().await? {
                for item in page {
                    yield item;
                }
            }
        }
    }
}

impl<S: PageSource> fmt::Debug for Paginator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginator")
            .field("operation", &S::OPERATION)
            .field("limit", &self.limit)
            .field("max_items", &self.max_items)
            .field("cursor", &self.cursor)
            .field("state", &self.state)
            .field("retrieved", &self.retrieved)
            .finish()
    }
}
