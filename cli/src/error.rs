use std::{fmt, path::PathBuf};

use miette::Diagnostic;
use shardline_lite::backend::error::SnapshotError;
use shardline_sdk::{
    error::{PaginationAborted, SdkError},
    types::ValidationError,
};
use thiserror::Error;

const BUG_HELP: &str = color_print::cstr!(
    "\n<cyan><bold>Looks like you may have encountered a bug!</bold></cyan>\n\n\
     <green> > Rerun with </green><bold>RUST_LOG=debug</bold><green> and include the output \
     when reporting it.</green>
"
);

const VALIDATION_HELP: &str = "Run the command with `--help` to see the accepted values.";

#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] CliConfigError),

    #[error("Failed to load service state from {}", .0.display())]
    #[diagnostic(help(
        "Remove or fix the file, or point `--state-file` at another location."
    ))]
    LoadState(PathBuf, #[source] SnapshotError),

    #[error("Failed to save service state to {}", .0.display())]
    SaveState(PathBuf, #[source] SnapshotError),

    #[error("{}: {}", .0, .1)]
    #[diagnostic(help("{}", VALIDATION_HELP))]
    Validation(OpKind, #[source] SdkError),

    #[error("{}: {}", .0, .1)]
    Operation(OpKind, #[source] SdkError),

    #[error("{}: {}", .0, .1)]
    #[diagnostic(help("{}", BUG_HELP))]
    Unexpected(OpKind, #[source] SdkError),

    #[error("{kind} after {retrieved} items: {source}")]
    ListingAborted {
        kind: OpKind,
        retrieved: usize,
        #[help]
        resume: Option<String>,
        #[source]
        source: SdkError,
    },
}

impl CliError {
    pub fn op(kind: OpKind, source: SdkError) -> Self {
        match source {
            SdkError::Validation(_) => Self::Validation(kind, source),
            SdkError::Transport { .. } | SdkError::StalledPagination { .. } => {
                Self::Operation(kind, source)
            }
            SdkError::Marshal { .. }
            | SdkError::Unmarshal { .. }
            | SdkError::InvalidResponse { .. } => Self::Unexpected(kind, source),
        }
    }

    /// A listing that failed part way; the help names the cursor to resume from.
    pub fn aborted<C: fmt::Display>(kind: OpKind, aborted: PaginationAborted<C>) -> Self {
        if aborted.retrieved == 0 && aborted.resume_after.is_none() {
            return Self::op(kind, aborted.source);
        }
        Self::ListingAborted {
            kind,
            retrieved: aborted.retrieved,
            resume: aborted
                .resume_after
                .map(|cursor| format!("Rerun with `--start-after {cursor}` to continue.")),
            source: aborted.source,
        }
    }
}

#[derive(Debug, Clone, Copy, strum::AsRefStr)]
#[strum(serialize_all = "title_case")]
pub enum OpKind {
    CreateStream,
    DeleteStream,
    DescribeStream,
    ListShards,
    ListStreams,
    #[strum(serialize = "increase retention period")]
    IncreaseRetention,
    #[strum(serialize = "decrease retention period")]
    DecreaseRetention,
    UpdateShardCount,
    AddTags,
    RemoveTags,
    ListTags,
    DescribeLimits,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to {}", self.as_ref().to_lowercase())
    }
}

impl std::error::Error for OpKind {}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TagParseError {
    #[error("Invalid tag format: '{value}'. Expected 'key=value'")]
    InvalidFormat { value: String },

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

#[derive(Error, Debug, Diagnostic)]
pub enum CliConfigError {
    #[error("Failed to find a home for config directory")]
    DirNotFound,

    #[error("Failed to load config file")]
    #[diagnostic(help(
        "Check `~/.config/shardline/config.toml` and any `SHARDLINE_*` environment variables."
    ))]
    Load(#[from] config::ConfigError),

    #[error("Failed to write config file")]
    Write(#[source] std::io::Error),

    #[error("Failed to serialize config")]
    Serialize(#[source] toml::ser::Error),

    #[error("Invalid value '{1}' for config key '{0}'")]
    InvalidValue(String, String),
}

#[cfg(test)]
mod tests {
    use shardline_sdk::{
        error::{PaginationAborted, SdkError},
        transport::Operation,
        types::{Constraint, ValidationError},
    };

    use super::{CliError, OpKind};

    #[test]
    fn op_kind_reads_as_a_failure() {
        assert_eq!(
            OpKind::UpdateShardCount.to_string(),
            "Failed to update shard count"
        );
        assert_eq!(
            OpKind::DecreaseRetention.to_string(),
            "Failed to decrease retention period"
        );
    }

    #[test]
    fn validation_failures_are_their_own_variant() {
        let source = ValidationError::new(
            "ShardCount",
            Constraint::Range { min: 1, max: 100 },
            0,
        );
        let err = CliError::op(OpKind::CreateStream, SdkError::Validation(source.into()));
        assert!(matches!(err, CliError::Validation(OpKind::CreateStream, _)));
        assert!(err.to_string().contains("ShardCount"));
    }

    #[test]
    fn aborted_listing_points_at_the_resume_cursor() {
        let aborted = PaginationAborted {
            retrieved: 3,
            resume_after: Some("orders"),
            source: SdkError::StalledPagination {
                operation: Operation::ListStreams,
            },
        };
        match CliError::aborted(OpKind::ListStreams, aborted) {
            CliError::ListingAborted {
                retrieved, resume, ..
            } => {
                assert_eq!(retrieved, 3);
                assert!(resume.expect("help").contains("--start-after orders"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn failed_first_page_is_a_plain_operation_error() {
        let aborted = PaginationAborted::<&str> {
            retrieved: 0,
            resume_after: None,
            source: SdkError::StalledPagination {
                operation: Operation::ListTagsForStream,
            },
        };
        assert!(matches!(
            CliError::aborted(OpKind::ListTags, aborted),
            CliError::Operation(OpKind::ListTags, _)
        ));
    }
}
