mod cli;
mod config;
mod error;
mod lite;
mod ops;
mod types;

use clap::Parser;
use cli::{Cli, Command, ConfigCommand};
use colored::Colorize;
use config::{ConfigKey, load_cli_config, load_config_file, set_config_value, unset_config_value};
use error::CliError;
use futures::TryStreamExt;
use lite::LiteSession;
use strum::VariantNames;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Style, object::Columns},
};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};
use types::{LimitsRow, ScalingRow, ShardRow, StreamSummary, TagRow};

#[tokio::main]
async fn main() -> miette::Result<()> {
    miette::set_panic_hook();
    run().await?;
    Ok(())
}

async fn run() -> Result<(), CliError> {
    let commands = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_span_events(FmtSpan::NEW)
                .compact()
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Command::Config(config_cmd) = &commands.command {
        match config_cmd {
            ConfigCommand::List => {
                let config = load_config_file()?;
                for k in ConfigKey::VARIANTS {
                    if let Ok(key) = k.parse::<ConfigKey>()
                        && let Some(v) = config.get(key)
                    {
                        println!("{} = {}", k, v);
                    }
                }
            }
            ConfigCommand::Get { key } => {
                let config = load_config_file()?;
                if let Some(v) = config.get(*key) {
                    println!("{}", v);
                }
            }
            ConfigCommand::Set { key, value } => {
                let saved_path = set_config_value(*key, value.clone())?;
                eprintln!("{}", format!("✓ {} set", key).green().bold());
                eprintln!(
                    "  Configuration saved to: {}",
                    saved_path.display().to_string().cyan()
                );
            }
            ConfigCommand::Unset { key } => {
                let saved_path = unset_config_value(*key)?;
                eprintln!("{}", format!("✓ {} unset", key).green().bold());
                eprintln!(
                    "  Configuration saved to: {}",
                    saved_path.display().to_string().cyan()
                );
            }
        }
        return Ok(());
    }

    let cli_config = load_cli_config()?;
    let state_file = match commands.state_file {
        Some(path) => path,
        None => cli_config.state_file()?,
    };
    let page_size = cli_config.page_size();
    let session = LiteSession::open(state_file, cli_config.backend_config())?;
    let client = session.client();
    let mutation = commands.command.is_mutation();

    match commands.command {
        Command::Config(..) => unreachable!(),

        Command::CreateStream(args) => {
            ops::create_stream(client, args).await?;
            eprintln!("{}", "✓ Stream created".green().bold());
        }

        Command::DeleteStream { stream } => {
            ops::delete_stream(client, stream).await?;
            eprintln!("{}", "✓ Stream deleted".green().bold());
        }

        Command::DescribeStream(args) => {
            let from_start = args.start_after.is_none();
            let description = ops::describe_stream(client, args).await?;
            let open_shards =
                ops::open_shard_count(client, &description, from_start, page_size).await?;
            print_table([StreamSummary::new(&description, open_shards)]);
            print_table(description.shards.values.iter().map(ShardRow::from));
        }

        Command::ListShards(args) => {
            let shards = ops::list_shards(client, args, page_size).await?;
            print_table(shards.iter().map(ShardRow::from));
        }

        Command::ListStreams(args) => {
            let mut streams = ops::list_streams(client, args, page_size).await?;
            while let Some(stream) = streams.try_next().await? {
                println!("{stream}");
            }
        }

        Command::IncreaseStreamRetentionPeriod(args) => {
            let hours = args.hours;
            ops::increase_retention(client, args).await?;
            eprintln!(
                "{}",
                format!("✓ Retention period increased to {hours}h")
                    .green()
                    .bold()
            );
        }

        Command::DecreaseStreamRetentionPeriod(args) => {
            let hours = args.hours;
            ops::decrease_retention(client, args).await?;
            eprintln!(
                "{}",
                format!("✓ Retention period decreased to {hours}h")
                    .green()
                    .bold()
            );
        }

        Command::UpdateShardCount(args) => {
            let output = ops::update_shard_count(client, args).await?;
            eprintln!("{}", "✓ Shard count updated".green().bold());
            print_table([ScalingRow::from(output)]);
        }

        Command::AddTagsToStream(args) => {
            let count = args.tags.len();
            ops::add_tags(client, args).await?;
            eprintln!("{}", format!("✓ {count} tag(s) added").green().bold());
        }

        Command::RemoveTagsFromStream(args) => {
            ops::remove_tags(client, args).await?;
            eprintln!("{}", "✓ Tags removed".green().bold());
        }

        Command::ListTagsForStream(args) => {
            let tags = ops::collect(ops::list_tags(client, args, page_size).await?).await?;
            print_table(tags.iter().map(TagRow::from));
        }

        Command::DescribeLimits => {
            let limits = ops::describe_limits(client).await?;
            print_table([LimitsRow::from(limits)]);
        }
    };

    if mutation {
        session.save()?;
    }

    Ok(())
}

fn print_table<R: Tabled>(rows: impl IntoIterator<Item = R>) {
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    table.modify(Columns::new(1..), Alignment::right());
    println!("{table}");
}
