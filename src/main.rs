//! GoldMind Terminal entry point

use clap::Parser;
use goldmind_terminal_lib::config::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    goldmind_terminal_lib::run(cli).await?;
    Ok(())
}
