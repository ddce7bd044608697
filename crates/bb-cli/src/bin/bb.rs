use anyhow::Result;
use bb_cli::{cli::Cli, commands, init_tracing};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let output = commands::run(cli).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
