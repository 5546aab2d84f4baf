use clap::Parser;
use lkit_config::HarnessConfig;
use tracing::Subscriber;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{reload, Registry};

mod cli;
mod commands;

type LevelHandle = reload::Handle<LevelFilter, Registry>;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let (subscriber, level) = log_subscriber(cli.verbose, std::io::stderr);
    subscriber.init();
    let config = load_config(&cli, &level, |key| std::env::var(key).ok())?;
    commands::run_command(cli, &config)
}

/// Stderr logging at WARN, or DEBUG when verbose. Must be installed before
/// the config is resolved; the returned handle can raise the level later.
fn log_subscriber<W>(
    verbose: bool,
    writer: W,
) -> (impl Subscriber + Send + Sync + 'static, LevelHandle)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let initial = if verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    let (filter, handle) = reload::Layer::new(initial);
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(writer));
    (subscriber, handle)
}

fn load_config<F>(
    cli: &cli::Cli,
    level: &LevelHandle,
    lookup: F,
) -> anyhow::Result<HarnessConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let config = HarnessConfig::resolve(cli.config.as_deref(), lookup)?;
    if config.debug {
        level.modify(|filter| *filter = LevelFilter::DEBUG)?;
    }
    Ok(config)
}
