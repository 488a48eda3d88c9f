use serde::{Deserialize, Serialize};
use shardline_common::types::account::AccountLimits;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeLimitsResponse {
    /// Maximum number of open shards the account may hold.
    pub shard_limit: u32,
    /// Open shards across all of the account's streams.
    pub open_shard_count: u32,
}

impl From<AccountLimits> for DescribeLimitsResponse {
    fn from(value: AccountLimits) -> Self {
        Self {
            shard_limit: value.shard_limit,
            open_shard_count: value.open_shard_count,
        }
    }
}

impl From<DescribeLimitsResponse> for AccountLimits {
    fn from(value: DescribeLimitsResponse) -> Self {
        Self {
            shard_limit: value.shard_limit,
            open_shard_count: value.open_shard_count,
        }
    }
}
