//! Memory Scramble - concurrent matching game server.

use anyhow::{Context, Result};
use clap::Parser;
use memory_scramble::{Board, Cli, Command};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { board, host, port } => {
            let path = board;
            let board = Board::from_file(&path)
                .with_context(|| format!("loading board {}", path.display()))?;
            info!(
                board = %path.display(),
                rows = board.rows(),
                cols = board.cols(),
                "board loaded"
            );
            memory_scramble::serve(board, &host, port).await?;
        }
        Command::Check { board } => {
            let path = board;
            let board = Board::from_file(&path)
                .with_context(|| format!("loading board {}", path.display()))?;
            println!("{}x{}", board.rows(), board.cols());
        }
    }

    Ok(())
}
