use std::ops::RangeInclusive;

pub const MAX_STREAM_NAME_LEN: usize = 128;

pub const MAX_SHARD_ID_LEN: usize = 128;

pub const MAX_TAG_KEY_LEN: usize = 128;

pub const MAX_TAG_VALUE_LEN: usize = 256;

/// Sequence numbers are decimal strings of up to 129 digits.
pub const MAX_SEQUENCE_NUMBER_DIGITS: usize = 129;

pub const RETENTION_HOURS_INCREASE: RangeInclusive<u32> = 1..=168;

pub const RETENTION_HOURS_DECREASE: RangeInclusive<u32> = 24..=168;

/// Retention assigned to newly created streams.
pub const DEFAULT_RETENTION_HOURS: u32 = 24;

pub const DEFAULT_PAGE_SIZE: usize = 100;

pub const MAX_LIST_STREAMS_LIMIT: usize = 10_000;

pub const MAX_DESCRIBE_STREAM_LIMIT: usize = 10_000;

pub const MAX_LIST_TAGS_LIMIT: usize = 50;

/// Number of tags (or tag keys) accepted by a single add/remove call.
pub const TAGS_PER_REQUEST: RangeInclusive<usize> = 1..=10;

pub const MAX_TAGS_PER_STREAM: usize = 50;

pub const MAX_SHARD_COUNT: u32 = 100_000;

pub const DEFAULT_SHARD_LIMIT: u32 = 500;
