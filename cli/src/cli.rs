use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, builder::styling};
use shardline_sdk::types::{
    ExclusiveStartShardId, ExclusiveStartStreamName, ExclusiveStartTagKey, StreamName, TagKey,
};

use crate::types::TagArg;

const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::Green.on_default().bold())
    .usage(styling::AnsiColor::Green.on_default().bold())
    .literal(styling::AnsiColor::Blue.on_default().bold())
    .placeholder(styling::AnsiColor::Cyan.on_default());

const GENERAL_USAGE: &str = color_print::cstr!(
    r#"
    <dim>$</dim> <bold>shardline create-stream orders --shard-count 4</bold>
    <dim>$</dim> <bold>shardline list-streams --limit 100</bold>
    "#
);

#[derive(Parser, Debug)]
#[command(name = "shardline", version, override_usage = GENERAL_USAGE, styles = STYLES)]
pub struct Cli {
    /// Service state file. Overrides the `state_file` config key.
    #[arg(long, global = true, value_name = "PATH")]
    pub state_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Create a stream.
    CreateStream(CreateStreamArgs),

    /// Delete a stream.
    DeleteStream {
        /// Name of the stream to delete.
        stream: StreamName,
    },

    /// Describe a stream and one page of its shards.
    DescribeStream(DescribeStreamArgs),

    /// List every shard of a stream, following pages.
    ListShards(ListShardsArgs),

    /// List streams.
    ListStreams(ListStreamsArgs),

    /// Increase the retention period of a stream.
    IncreaseStreamRetentionPeriod(RetentionArgs),

    /// Decrease the retention period of a stream.
    DecreaseStreamRetentionPeriod(RetentionArgs),

    /// Uniformly rescale the open shards of a stream.
    ///
    /// The target must be between half and double the current open shard
    /// count.
    UpdateShardCount(UpdateShardCountArgs),

    /// Add or overwrite tags on a stream.
    AddTagsToStream(AddTagsArgs),

    /// Remove tags from a stream. Keys that are not present are ignored.
    RemoveTagsFromStream(RemoveTagsArgs),

    /// List the tags of a stream.
    ListTagsForStream(ListTagsArgs),

    /// Show the account shard limit and how much of it is in use.
    DescribeLimits,
}

impl Command {
    /// Whether a successful run changes service state that must be saved.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::CreateStream(..)
                | Self::DeleteStream { .. }
                | Self::IncreaseStreamRetentionPeriod(..)
                | Self::DecreaseStreamRetentionPeriod(..)
                | Self::UpdateShardCount(..)
                | Self::AddTagsToStream(..)
                | Self::RemoveTagsFromStream(..)
        )
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// List all configuration values.
    List,
    /// Get a configuration value.
    Get {
        /// Config key
        key: crate::config::ConfigKey,
    },
    /// Set a configuration value.
    Set {
        /// Config key
        key: crate::config::ConfigKey,
        /// Value to set
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Config key
        key: crate::config::ConfigKey,
    },
}

#[derive(Args, Debug)]
pub struct CreateStreamArgs {
    /// Name of the stream to create.
    pub stream: StreamName,

    /// Number of shards the stream starts with.
    #[arg(short = 'c', long, default_value_t = 1)]
    pub shard_count: u32,
}

#[derive(Args, Debug)]
pub struct DescribeStreamArgs {
    /// Name of the stream to describe.
    pub stream: StreamName,

    /// Maximum number of shards to include (max 10000).
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Only include shards whose id sorts after this one.
    #[arg(short = 's', long)]
    pub start_after: Option<ExclusiveStartShardId>,
}

#[derive(Args, Debug)]
pub struct ListShardsArgs {
    /// Name of the stream.
    pub stream: StreamName,

    /// Only list shards whose id sorts after this one.
    #[arg(short = 's', long)]
    pub start_after: Option<ExclusiveStartShardId>,

    /// Only list open shards.
    #[arg(long, default_value_t = false)]
    pub open: bool,
}

#[derive(Args, Debug)]
pub struct ListStreamsArgs {
    /// Filter to stream names that lexicographically start after this name.
    #[arg(short = 's', long)]
    pub start_after: Option<ExclusiveStartStreamName>,

    /// Limit the number of streams to return. Acts as page size (max 10000) when using
    /// --no-auto-paginate.
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Returns only a single page of streams instead of auto-paginating.
    #[arg(long, default_value_t = false)]
    pub no_auto_paginate: bool,
}

#[derive(Args, Debug)]
pub struct RetentionArgs {
    /// Name of the stream.
    pub stream: StreamName,

    /// New retention period in hours.
    pub hours: u32,
}

#[derive(Args, Debug)]
pub struct UpdateShardCountArgs {
    /// Name of the stream.
    pub stream: StreamName,

    /// Open shard count after scaling.
    pub target_shard_count: u32,
}

#[derive(Args, Debug)]
pub struct AddTagsArgs {
    /// Name of the stream.
    pub stream: StreamName,

    /// Tags in the form `key=value`.
    #[arg(required = true, value_name = "KEY=VALUE")]
    pub tags: Vec<TagArg>,
}

#[derive(Args, Debug)]
pub struct RemoveTagsArgs {
    /// Name of the stream.
    pub stream: StreamName,

    /// Keys of the tags to remove.
    #[arg(required = true)]
    pub keys: Vec<TagKey>,
}

#[derive(Args, Debug)]
pub struct ListTagsArgs {
    /// Name of the stream.
    pub stream: StreamName,

    /// Only list tags whose key sorts after this one.
    #[arg(short = 's', long)]
    pub start_after: Option<ExclusiveStartTagKey>,

    /// Limit the number of tags to return. Acts as page size (max 50) when using
    /// --no-auto-paginate.
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Returns only a single page of tags instead of auto-paginating.
    #[arg(long, default_value_t = false)]
    pub no_auto_paginate: bool,
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use rstest::rstest;

    use super::{Cli, Command};

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case(&["shardline", "create-stream", "orders"], true)]
    #[case(&["shardline", "describe-stream", "orders"], false)]
    #[case(&["shardline", "add-tags-to-stream", "orders", "env=prod"], true)]
    #[case(&["shardline", "describe-limits"], false)]
    #[case(&["shardline", "list-shards", "orders", "--open"], false)]
    fn mutations(#[case] args: &[&str], #[case] mutation: bool) {
        let cli = Cli::try_parse_from(args).expect("parse");
        assert_eq!(cli.command.is_mutation(), mutation);
    }

    #[test]
    fn state_file_is_global() {
        let cli = Cli::try_parse_from(["shardline", "describe-limits", "--state-file", "s.json"])
            .expect("parse");
        assert_eq!(cli.state_file.as_deref(), Some("s.json".as_ref()));
        assert!(matches!(cli.command, Command::DescribeLimits));
    }

    #[rstest]
    #[case(&["shardline", "create-stream", "bad name!"])]
    #[case(&["shardline", "add-tags-to-stream", "orders", "novalue"])]
    #[case(&["shardline", "remove-tags-from-stream", "orders"])]
    #[case(&["shardline", "update-shard-count", "orders", "-1"])]
    fn rejected_arguments(#[case] args: &[&str]) {
        assert!(Cli::try_parse_from(args).is_err());
    }
}
