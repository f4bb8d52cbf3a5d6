//! CLI module for the expense manager server
//!
//! Uses clap for argument parsing. Without a subcommand the binary serves
//! HTTP; `check-config` only validates configuration.

use crate::utils::toml_config::AppConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Expense manager backend: registration, login and token refresh.
#[derive(Parser, Debug)]
#[command(
    name = "expense-manager-server",
    version,
    about = "Expense manager backend: registration, login and token refresh",
    after_help = "EXAMPLES:\n    \
                  expense-manager-server                        # Serve (reads expense.toml if present)\n    \
                  expense-manager-server --config prod.toml     # Use a custom config file\n    \
                  expense-manager-server check-config           # Validate configuration and exit"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "expense.toml", global = true)]
    pub config: PathBuf,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate the configuration (including the JWT secret) and print a summary
    CheckConfig,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Log filter directive: `--verbose` wins over the configured level.
    pub fn log_level<'a>(&self, config: &'a AppConfig) -> &'a str {
        if self.verbose {
            "debug"
        } else {
            &config.server.log_level
        }
    }
}

/// Human-readable configuration summary, without the secret itself.
pub fn config_summary(config: &AppConfig) -> String {
    format!(
        "server:   {}\n\
         origin:   {}\n\
         database: {} (lookup timeout {}s)\n\
         auth:     secret from ${}, token ttl {}",
        config.bind_address(),
        config.server.client_origin.as_deref().unwrap_or("*"),
        config.database.url,
        config.database.lookup_timeout_secs,
        config.auth.jwt_secret_env,
        config.auth.token_ttl,
    )
}
