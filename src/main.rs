use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cleanup;
mod cli;
mod context;
mod history;
mod metadata;
mod outputs;
mod renderer;
mod report_id;
mod results;
mod util;
mod workflow;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::PublishArgs::parse();
    workflow::run(args)
}
