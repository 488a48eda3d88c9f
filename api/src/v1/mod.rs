pub mod account;
pub mod error;
pub mod shard;
pub mod stream;
pub mod tag;

use serde::{Deserialize, Serialize};

/// Service operation a request body is addressed to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
// Keep this alphabetized.
pub enum Operation {
    AddTagsToStream,
    CreateStream,
    DecreaseStreamRetentionPeriod,
    DeleteStream,
    DescribeLimits,
    DescribeStream,
    IncreaseStreamRetentionPeriod,
    ListStreams,
    ListTagsForStream,
    RemoveTagsFromStream,
    UpdateShardCount,
}

impl Operation {
    pub const TARGET_PREFIX: &'static str = "Shardline_20240601";

    /// Value of the target header used by JSON-over-HTTP transports.
    pub fn target(self) -> String {
        format!("{}.{}", Self::TARGET_PREFIX, self)
    }
}

/// Body of operations that return nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

#[cfg(test)]
mod tests {
    use super::Operation;

    #[test]
    fn target_header() {
        assert_eq!(
            Operation::ListStreams.target(),
            "Shardline_20240601.ListStreams"
        );
        assert_eq!(
            "UpdateShardCount".parse::<Operation>().unwrap(),
            Operation::UpdateShardCount
        );
    }
}
