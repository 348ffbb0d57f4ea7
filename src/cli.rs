//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Geolocator - IP geolocation lookup and storage service
#[derive(Debug, Parser)]
#[command(name = "geolocator")]
#[command(version)]
#[command(about = "Resolve, store and serve IP geolocation records", long_about = None)]
pub struct Cli {
    /// Configuration file path (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Resolve an IP once against the configured store and provider
    Lookup {
        /// IP address to resolve
        ip: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Generate a sample configuration file
    Generate {
        /// Output path (prints to stdout when omitted)
        #[arg(long, short = 'o')]
        output: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
