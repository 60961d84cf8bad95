//! scopecheck - OAuth scope enforcement probe library
//!
//! This library calls a backend's scope-protected REST endpoints with a
//! single access token and reports, per endpoint, whether the backend
//! enforced the required scope the way it should.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `harness`: Probe registry, identifier resolution, execution and classification
//! - `token`: Scope and organization claims read from JWT access tokens
//! - `report`: Terminal, JSON and HTML rendering of results
//! - `server`: HTTP report server
//! - `commands`: Handlers behind the CLI subcommands
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use scopecheck::harness::{run_all_scope_tests, Session};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let session = Session::from_token("http://localhost:3000", "eyJ...");
//!     let results = run_all_scope_tests(&reqwest::Client::new(), &session).await;
//!     let failed = results.iter().filter(|r| !r.passed).count();
//!     println!("{} of {} probes failed", failed, results.len());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod harness;
pub mod report;
pub mod server;
pub mod token;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, ScopeCheckError};
pub use harness::{Category, ScopeTestCase, ScopeTestResult, Session};
