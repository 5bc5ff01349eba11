//! Command-line interface definitions using clap
//!
//! Every flag can also be supplied through the environment variable named
//! next to it.

use clap::Parser;

/// Snaplink - a small URL shortener
#[derive(Parser, Debug, Default)]
#[command(name = "snaplink")]
#[command(version)]
#[command(about = "A small URL shortener with per-visitor history", long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    /// Listen address, e.g. ":8080" or "127.0.0.1:8080"
    #[arg(short = 'a', long = "address", env = "SERVER_ADDRESS")]
    pub address: Option<String>,

    /// Prefix for returned short URLs
    #[arg(short = 'b', long = "base-url", env = "BASE_URL")]
    pub base_url: Option<String>,

    /// Append-only log file for the file backend
    #[arg(short = 'f', long = "file-storage-path", env = "FILE_STORAGE_PATH")]
    pub file_storage_path: Option<String>,

    /// Database DSN (sqlite://, mysql://, postgres://)
    #[arg(short = 'd', long = "database-dsn", env = "DATABASE_DSN")]
    pub database_dsn: Option<String>,
}
