//! # stockdaily CLI

use clap::Parser;

use crate::cli::Commands;

mod cli;

#[derive(Parser)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    stockdaily::init();

    match &cli.command {
        Commands::Backfill(cmd) => {
            cmd.exec().await;
        }
        Commands::Check(cmd) => {
            cmd.exec().await;
        }
        Commands::Config(cmd) => {
            cmd.exec().await;
        }
        Commands::List(cmd) => {
            cmd.exec().await;
        }
        Commands::Poll(cmd) => {
            cmd.exec().await;
        }
        Commands::Run(cmd) => {
            cmd.exec().await;
        }
    }
}
