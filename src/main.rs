mod cli;
mod config;
mod error;
mod jenkins;
mod output;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let code = cli.execute().await?;

    std::process::exit(code);
}
