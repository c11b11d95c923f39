use anyhow::Result;
use clap::Parser;
use modelchat::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    modelchat::run(args).await
}
