//! scopecheck - OAuth scope enforcement probe
//!
#![doc = "Main entry point for the scopecheck command-line tool."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scopecheck::cli::{Cli, Commands};
use scopecheck::commands;
use scopecheck::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/scopecheck.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Run { category, json } => {
            tracing::info!("Starting scope test run against {}", config.backend.url);
            let all_passed = commands::r#run::run_scope_tests(config, category, json).await?;
            if !all_passed {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Serve { port } => {
            tracing::info!("Starting report server");
            commands::serve::serve_report(config, port).await?;
            Ok(())
        }
        Commands::Scopes => {
            commands::scopes::show_scopes(&config)?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so that `run --json` output stays machine-readable.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "scopecheck=debug"
    } else {
        "scopecheck=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
