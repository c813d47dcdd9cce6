//! simcheck - acceptance-test harness for external flow-solver pipelines

use clap::Parser;
use simcheck::{cli, commands::Commands, common};

#[derive(Parser)]
#[command(name = "simcheck", about = "Acceptance-test harness for flow-solver pipelines")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    common::logging::init_cli();

    let cli = Cli::parse();

    if let Err(e) = cli::dispatch(cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
