//! Command-line interface definition for scopecheck
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands to run the probes, serve the report page, and
//! inspect an access token.

use clap::{Parser, Subcommand};

/// scopecheck - OAuth scope enforcement probe
///
/// Calls scope-protected REST endpoints with one access token and checks
/// that the backend lets the token through when it holds the required
/// scope and answers 401 when it does not.
#[derive(Parser, Debug, Clone)]
#[command(name = "scopecheck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/scopecheck.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Backend base URL (overrides config and BACKEND_URL)
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Bearer access token (overrides config and ACCESS_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Space-separated scopes the token carries; read from the token when omitted
    #[arg(long, global = true)]
    pub scopes: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for scopecheck
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the scope probes and print a report
    Run {
        /// Only run one category (org, users, user-groups, teams)
        #[arg(short = 'C', long)]
        category: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve the scope test report over HTTP
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show the scopes and organization an access token claims
    Scopes,
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
