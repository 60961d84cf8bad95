//! Configuration management for scopecheck
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//!
//! Precedence, lowest to highest: built-in defaults, YAML file,
//! environment variables, command-line flags.

use crate::error::{Result, ScopeCheckError};
use crate::harness::Session;
use crate::token;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for scopecheck
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend under test
    #[serde(default)]
    pub backend: BackendConfig,

    /// Credentials used for probing
    #[serde(default)]
    pub auth: AuthConfig,

    /// Report server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend REST API
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Per-request timeout applied by the HTTP client (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_backend_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

/// Credentials used for a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Bearer access token obtained from the OAuth flow
    #[serde(default)]
    pub access_token: Option<String>,

    /// Space-separated scope override
    ///
    /// When unset, scopes are read from the token's `scope` claim.
    #[serde(default)]
    pub scopes: Option<String>,
}

/// Report server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,

    #[serde(default = "default_server_port")]
    pub port: u16,
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8888
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Config {
    /// Load configuration from file, environment, and CLI overrides
    ///
    /// A missing file is not an error: defaults are used instead.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - Parsed command line, used for overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ScopeCheckError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ScopeCheckError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(url) = std::env::var("BACKEND_URL") {
            self.backend.url = url;
        }

        if let Ok(timeout) = std::env::var("SCOPECHECK_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.backend.request_timeout_seconds = value;
            } else {
                tracing::warn!("Invalid SCOPECHECK_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(access_token) = std::env::var("ACCESS_TOKEN") {
            if !access_token.trim().is_empty() {
                self.auth.access_token = Some(access_token);
            }
        }

        if let Ok(scopes) = std::env::var("SCOPECHECK_SCOPES") {
            self.auth.scopes = Some(scopes);
        }

        if let Ok(host) = std::env::var("SCOPECHECK_HOST") {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("SCOPECHECK_PORT") {
            if let Ok(value) = port.parse() {
                self.server.port = value;
            } else {
                tracing::warn!("Invalid SCOPECHECK_PORT: {}", port);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(url) = &cli.backend_url {
            self.backend.url = url.clone();
        }

        if let Some(access_token) = &cli.token {
            self.auth.access_token = Some(access_token.clone());
        }

        if let Some(scopes) = &cli.scopes {
            self.auth.scopes = Some(scopes.clone());
        }
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns [`ScopeCheckError::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.backend.url).map_err(|e| {
            ScopeCheckError::Config(format!(
                "backend.url is not a valid URL ({}): {}",
                e, self.backend.url
            ))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ScopeCheckError::Config(format!(
                "backend.url must use http or https, got {}",
                url.scheme()
            ))
            .into());
        }

        if self.backend.request_timeout_seconds == 0 {
            return Err(ScopeCheckError::Config(
                "backend.request_timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.server.host.trim().is_empty() {
            return Err(
                ScopeCheckError::Config("server.host cannot be empty".to_string()).into(),
            );
        }

        Ok(())
    }

    /// Access token, if one is configured and non-blank
    pub fn access_token(&self) -> Option<&str> {
        self.auth
            .access_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Builds the run session for the configured token
    ///
    /// Scopes come from `auth.scopes` when set, otherwise from the token.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeCheckError::MissingToken`] when no token is configured.
    pub fn session(&self) -> Result<Session> {
        let access_token = self.access_token().ok_or(ScopeCheckError::MissingToken)?;

        let session = match &self.auth.scopes {
            Some(scopes) => Session::new(
                self.backend.url.clone(),
                access_token,
                token::parse_scopes(scopes),
            ),
            None => Session::from_token(self.backend.url.clone(), access_token),
        };

        Ok(session)
    }

    /// Shared HTTP client honoring the configured timeout
    pub fn http_client(&self) -> Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.backend.request_timeout_seconds))
            .user_agent(concat!("scopecheck/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ScopeCheckError::from)?;
        Ok(client)
    }
}
