//! CLI module for Satchel
//!
//! Provides command-line interface parsing for the satchel-server binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Satchel - accounts, sessions and shopping carts
#[derive(Parser, Debug)]
#[command(
    name = "satchel-server",
    version,
    about = "Satchel - accounts, cookie sessions and per-user shopping carts",
    long_about = "An HTTP backend that registers and authenticates users, issues signed\n\
                  session cookies, and stores a shopping cart per account.\n\n\
                  Run without arguments to start the server, or use 'init' to write a starter config.",
    after_help = "EXAMPLES:\n    \
                  satchel-server init                 # Write satchel.toml and .env.example\n    \
                  satchel-server                      # Start the server (requires satchel.toml)\n    \
                  satchel-server --config prod.toml   # Use a custom config file\n    \
                  satchel-server config --validate    # Check the configuration"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "satchel.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a starter satchel.toml and .env.example
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,

        /// Host address for the server
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port for the server
        #[arg(long, default_value = "3000")]
        port: u16,
    },

    /// Show configuration information
    Config {
        /// Validate the configuration, including the secret env var
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
