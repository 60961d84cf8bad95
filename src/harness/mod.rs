//! Scope verification harness
//!
//! Probes a backend's REST endpoints with one access token and checks that
//! scope enforcement behaves as expected: a token holding the required scope
//! gets through the authorization layer (2xx or 4xx), a token lacking it is
//! rejected with exactly `401`.
//!
//! # Module Layout
//!
//! - [`registry`]     -- static catalog of probes grouped by category
//! - [`resolver`]     -- best-effort lookup of live resource identifiers
//! - [`materialize`]  -- placeholder substitution and query encoding
//! - [`executor`]     -- one authenticated request per probe
//! - [`classifier`]   -- pass/fail decision table
//! - [`orchestrator`] -- sequences a full run

pub mod classifier;
pub mod executor;
pub mod materialize;
pub mod orchestrator;
pub mod registry;
pub mod resolver;

pub use classifier::{classify, Verdict};
pub use orchestrator::{
    run_all_scope_tests, run_scope_tests, ScopeTestResult, Session, TRANSPORT_FAILURE,
};
pub use registry::{all_tests, select, tests_for, Category, HttpMethod, ScopeTestCase};
pub use resolver::{resolve_ids, ResolvedIds, ResourceKind};
