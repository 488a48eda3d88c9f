use shardline_common::types::account::AccountLimits;

use super::Backend;

impl Backend {
    pub fn describe_limits(&self) -> AccountLimits {
        let state = self.state.read();
        AccountLimits {
            shard_limit: self.config.shard_limit,
            open_shard_count: u32::try_from(state.open_shard_count()).unwrap_or(u32::MAX),
        }
    }
}
