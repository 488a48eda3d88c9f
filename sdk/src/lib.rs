//! Typed client for shardline stream services.
//!
//! Requests are assembled with immutable `*Input` builders and validated
//! before anything is handed to a [`Transport`](transport::Transport).
//! Listings can be fetched a page at a time or driven to exhaustion by a
//! [`Paginator`](pagination::Paginator), which follows the exclusive-start
//! cursor of each page.
//!
//! ```no_run
//! # async fn demo(transport: impl shardline_sdk::transport::Transport) -> Result<(), shardline_sdk::error::SdkError> {
//! use futures::TryStreamExt;
//! use shardline_sdk::{Client, types::ListAllStreamsInput};
//!
//! let client = Client::new(transport);
//! let names: Vec<_> = client
//!     .list_all_streams(ListAllStreamsInput::new().with_page_size(50))
//!     .into_stream()
//!     .try_collect()
//!     .await
//!     .map_err(|aborted| aborted.source)?;
//! # let _ = names;
//! # Ok(())
//! # }
//! ```

mod client;

pub mod error;
pub mod pagination;
pub mod transport;
pub mod types;

pub use client::{Client, DescribeStreamSource, ListStreamsSource, ListTagsSource};
pub use futures;
