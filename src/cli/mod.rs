//! CLI module for the Minecraft wiki bot
//!
//! Provides subcommands for the two ways of using the bot:
//! - `serve`: run the webhook + API server (default)
//! - `ask`: answer a single question from the command line

pub mod ask;
pub mod serve;

use clap::{Parser, Subcommand};

/// Retrieval-augmented Minecraft wiki bot for Nextcloud Talk
#[derive(Parser)]
#[command(name = "craftbot")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the webhook and API server
    Serve,

    /// Answer a single question and exit
    Ask(ask::AskArgs),
}
