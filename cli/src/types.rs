//! CLI-specific argument types and table rows.

use std::str::FromStr;

use shardline_sdk::types::{
    AccountLimits, Shard, StreamDescription, Tag, TagKey, TagValue, UpdateShardCountOutput,
};
use tabled::Tabled;

use crate::error::TagParseError;

/// A `key=value` pair. The key ends at the first `=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagArg(pub Tag);

impl FromStr for TagArg {
    type Err = TagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = s.split_once('=').ok_or_else(|| TagParseError::InvalidFormat {
            value: s.to_owned(),
        })?;
        let key: TagKey = key.parse()?;
        let value: TagValue = value.parse()?;
        Ok(Self(Tag::new(key, value)))
    }
}

impl From<TagArg> for Tag {
    fn from(arg: TagArg) -> Self {
        arg.0
    }
}

#[derive(Debug, Tabled)]
pub struct ShardRow {
    #[tabled(rename = "shard id")]
    pub shard_id: String,
    pub parent: String,
    #[tabled(rename = "adjacent parent")]
    pub adjacent_parent: String,
    #[tabled(rename = "hash keys")]
    pub hash_keys: String,
    #[tabled(rename = "sequence numbers")]
    pub sequence_numbers: String,
}

impl From<&Shard> for ShardRow {
    fn from(shard: &Shard) -> Self {
        let range = &shard.sequence_number_range;
        Self {
            shard_id: shard.shard_id.to_string(),
            parent: optional(shard.parent_shard_id.as_ref()),
            adjacent_parent: optional(shard.adjacent_parent_shard_id.as_ref()),
            hash_keys: format!(
                "{}..={}",
                shard.hash_key_range.starting(),
                shard.hash_key_range.ending()
            ),
            sequence_numbers: match range.ending() {
                Some(ending) => format!("{}..={}", range.starting(), ending),
                None => format!("{}..", range.starting()),
            },
        }
    }
}

fn optional(value: Option<impl ToString>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_owned())
}

#[derive(Debug, Tabled)]
pub struct TagRow {
    pub key: String,
    pub value: String,
}

impl From<&Tag> for TagRow {
    fn from(tag: &Tag) -> Self {
        Self {
            key: tag.key.to_string(),
            value: tag.value.to_string(),
        }
    }
}

#[derive(Debug, Tabled)]
pub struct StreamSummary {
    pub name: String,
    pub status: String,
    #[tabled(rename = "retention (hours)")]
    pub retention_period_hours: u32,
    #[tabled(rename = "open shards")]
    pub open_shards: usize,
    #[tabled(rename = "more shards")]
    pub has_more_shards: bool,
}

impl StreamSummary {
    /// `open_shards` counts the whole stream, which may span more than the
    /// described page.
    pub fn new(description: &StreamDescription, open_shards: usize) -> Self {
        Self {
            name: description.name.to_string(),
            status: description.status.to_string(),
            retention_period_hours: description.retention_period_hours,
            open_shards,
            has_more_shards: description.shards.has_more,
        }
    }
}

#[derive(Debug, Tabled)]
pub struct LimitsRow {
    #[tabled(rename = "shard limit")]
    pub shard_limit: u32,
    #[tabled(rename = "open shards")]
    pub open_shard_count: u32,
    pub available: u32,
}

impl From<AccountLimits> for LimitsRow {
    fn from(limits: AccountLimits) -> Self {
        Self {
            shard_limit: limits.shard_limit,
            open_shard_count: limits.open_shard_count,
            available: limits.available(),
        }
    }
}

#[derive(Debug, Tabled)]
pub struct ScalingRow {
    pub stream: String,
    #[tabled(rename = "previous shards")]
    pub current_shard_count: u32,
    #[tabled(rename = "target shards")]
    pub target_shard_count: u32,
}

impl From<UpdateShardCountOutput> for ScalingRow {
    fn from(output: UpdateShardCountOutput) -> Self {
        Self {
            stream: output.stream_name.to_string(),
            current_shard_count: output.current_shard_count,
            target_shard_count: output.target_shard_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::TagArg;
    use crate::error::TagParseError;

    #[rstest]
    #[case("env=prod", "env", "prod")]
    #[case("owner=", "owner", "")]
    #[case("query=a=b", "query", "a=b")]
    #[case("team name=core data", "team name", "core data")]
    fn parses_tags(#[case] input: &str, #[case] key: &str, #[case] value: &str) {
        let TagArg(tag) = input.parse().expect("valid tag");
        assert_eq!(tag.key.as_ref(), key);
        assert_eq!(tag.value.as_ref(), value);
    }

    #[rstest]
    #[case("novalue")]
    #[case("=value")]
    #[case("env=pr*d")]
    fn rejects_tags(#[case] input: &str) {
        assert!(input.parse::<TagArg>().is_err());
    }

    #[test]
    fn missing_separator_names_the_input() {
        assert_eq!(
            "novalue".parse::<TagArg>(),
            Err(TagParseError::InvalidFormat {
                value: "novalue".to_owned()
            })
        );
    }
}
