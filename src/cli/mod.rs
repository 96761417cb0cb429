//! CLI module - Command-line interface for `AniTrack`
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// `AniTrack` - personal anime tracker
/// Watch lists, premium collections and a JSON API for the web client
#[derive(Parser)]
#[command(name = "anitrack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the web server (default)
    #[command(alias = "web")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Add premium credits to an account
    GrantCredits {
        /// Account username
        username: String,
        /// Number of credits to add
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

pub use commands::*;
