//! CLI argument definitions using clap
//!
//! Commands:
//! - pressroom init --config <path>
//! - pressroom serve --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// pressroom - article storage and feed service
#[derive(Parser, Debug)]
#[command(name = "pressroom")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default configuration file
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./pressroom.json")]
        config: PathBuf,
    },

    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./pressroom.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
