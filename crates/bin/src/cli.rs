//! CLI argument definitions for the todolist binary.

use clap::{Parser, Subcommand};
use todolist::constants::MAX_SESSION_TIMEOUT_SECS;

/// Multi-user to-do list server
#[derive(Parser, Debug)]
#[command(name = "todolist")]
#[command(about = "todolist: multi-user to-do list server with cookie sessions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the todolist server
    Serve(ServeArgs),
    /// Check health of a running todolist server
    Health(HealthArgs),
}

/// Arguments for the serve command
#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value_t = 8080, env = "PORT")]
    pub port: u16,

    /// Bind address
    #[arg(long, default_value = "0.0.0.0", env = "TODOLIST_HOST")]
    pub host: String,

    /// Session lifetime in seconds, fixed from creation (at most one year)
    #[arg(
        long,
        default_value_t = 1800,
        env = "TODOLIST_SESSION_TIMEOUT",
        value_parser = clap::value_parser!(u64).range(1..=MAX_SESSION_TIMEOUT_SECS)
    )]
    pub session_timeout: u64,
}

impl Default for ServeArgs {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            session_timeout: 1800,
        }
    }
}

/// Arguments for the health command
#[derive(clap::Args, Debug)]
pub struct HealthArgs {
    /// Port of the server to check
    #[arg(short, long, default_value_t = 8080, env = "PORT")]
    pub port: u16,

    /// Host of the server to check
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Timeout in seconds
    #[arg(short, long, default_value_t = 5)]
    pub timeout: u64,
}
