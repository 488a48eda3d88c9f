/// Shard quota of an account and how much of it is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountLimits {
    pub shard_limit: u32,
    pub open_shard_count: u32,
}

impl AccountLimits {
    pub fn available(&self) -> u32 {
        self.shard_limit.saturating_sub(self.open_shard_count)
    }
}
