/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `run`    -- Execute the scope probes and print a report
- `serve`  -- Serve the report over HTTP
- `scopes` -- Show what an access token claims
*/

use crate::config::Config;
use crate::error::Result;
use crate::harness::{self, Category};
use crate::report;
use crate::server;

/// Probe run command
pub mod r#run {
    use super::*;

    /// Run the scope probes and print the report
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration (consumed)
    /// * `category` - Optional category name restricting the run
    /// * `json` - Print JSON instead of tables
    ///
    /// # Returns
    ///
    /// `true` when every probe passed.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown category, a missing access token, or
    /// an HTTP client that cannot be built. Failing probes are not errors.
    pub async fn run_scope_tests(
        config: Config,
        category: Option<String>,
        json: bool,
    ) -> Result<bool> {
        let category = category
            .as_deref()
            .map(str::parse::<Category>)
            .transpose()?;
        let session = config.session()?;
        let http = config.http_client()?;

        if session.scopes.is_empty() {
            tracing::warn!("Token carries no scopes; every probe expects 401");
        }
        if let Some(category) = category {
            tracing::info!("Running {} probes only", category);
        }

        let cases = harness::select(category);
        let results = harness::run_scope_tests(&http, &session, &cases).await;

        if json {
            println!("{}", report::to_json(&session, &results)?);
        } else {
            report::print_table(&session, &results);
        }

        for description in results.iter().filter_map(|r| r.failure_description()) {
            tracing::warn!("{}", description);
        }

        Ok(report::Summary::from_results(&results).all_passed())
    }

}

/// Report server command
pub mod serve {
    use super::*;
    use std::net::{IpAddr, SocketAddr};

    /// Serve the HTML and JSON report until interrupted
    ///
    /// A missing access token is not fatal here: the server starts and its
    /// pages explain how to supply one.
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration (consumed)
    /// * `port` - Optional port overriding `server.port`
    pub async fn serve_report(config: Config, port: Option<u16>) -> Result<()> {
        let port = port.unwrap_or(config.server.port);
        let host: IpAddr = config.server.host.parse().map_err(|e| {
            crate::error::ScopeCheckError::Config(format!(
                "server.host is not an IP address ({}): {}",
                e, config.server.host
            ))
        })?;

        let session = match config.session() {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        };
        let state = server::AppState::new(config.http_client()?, session);

        server::serve(SocketAddr::new(host, port), state).await
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_serve_rejects_hostname() {
            let mut config = Config::default();
            config.server.host = "localhost.invalid".to_string();
            let err = serve_report(config, Some(0)).await.unwrap_err();
            assert!(err.to_string().contains("server.host"));
        }
    }
}

/// Token inspection command
pub mod scopes {
    use super::*;

    /// Print the scopes a run would use and the token's organization
    pub fn show_scopes(config: &Config) -> Result<()> {
        let session = config.session()?;

        println!("Backend: {}", session.backend_url);
        match &session.org_id {
            Some(org_id) => println!("Organization: {}", org_id),
            None => println!("Organization: (not in token)"),
        }

        if config.auth.scopes.is_some() {
            println!("Scopes (configured override):");
        } else {
            println!("Scopes (from token):");
        }
        if session.scopes.is_empty() {
            println!("  (none)");
        }
        for scope in &session.scopes {
            println!("  {}", scope);
        }

        let cases = harness::all_tests();
        let held = cases
            .iter()
            .filter(|case| session.has_scope(case.required_scope))
            .count();
        println!(
            "Probes expected to pass authorization: {}/{}",
            held,
            cases.len()
        );

        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_show_scopes_requires_token() {
            assert!(show_scopes(&Config::default()).is_err());
        }

        #[test]
        fn test_show_scopes_with_override() {
            let mut config = Config::default();
            config.auth.access_token = Some("opaque".to_string());
            config.auth.scopes = Some("org:read".to_string());
            assert!(show_scopes(&config).is_ok());
        }
    }
}
