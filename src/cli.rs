//! Command-line interface for the Memory Scramble server.

use clap::{Parser, Subcommand};

/// Memory Scramble - concurrent matching game server
#[derive(Parser, Debug)]
#[command(name = "memory-scramble")]
#[command(about = "Concurrent matching game board over HTTP", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve a board file over HTTP
    Serve {
        /// Path to the board file
        board: std::path::PathBuf,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Validate a board file and print its dimensions
    Check {
        /// Path to the board file
        board: std::path::PathBuf,
    },
}
