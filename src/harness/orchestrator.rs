//! Scope test runs
//!
//! A run resolves live identifiers once, then executes every selected probe
//! strictly in registry order, classifying each response as it arrives.
//! Case-level failures never abort a run: the returned list always has one
//! result per selected probe.

use serde::Serialize;

use crate::harness::classifier::{classify, Verdict};
use crate::harness::executor::{execute_probe, normalize_base_url};
use crate::harness::materialize::{materialize, materialize_body, placeholder_map};
use crate::harness::registry::{all_tests, ScopeTestCase};
use crate::harness::resolver::resolve_ids;
use crate::token;

/// Status recorded when a probe failed before a response arrived
pub const TRANSPORT_FAILURE: i32 = -1;

/// The backend, token and granted scopes a run is performed against
///
/// Passed explicitly to every run so that no process-wide token state is
/// needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub backend_url: String,
    pub access_token: String,
    pub scopes: Vec<String>,
    /// Organization id claimed by the token, sent with organization-scoped
    /// probes
    pub org_id: Option<String>,
}

impl Session {
    /// Creates a session with an explicit scope list
    ///
    /// The organization id is still read from the token when it is a JWT.
    pub fn new(
        backend_url: impl Into<String>,
        access_token: impl Into<String>,
        scopes: Vec<String>,
    ) -> Self {
        let access_token = access_token.into();
        Self {
            backend_url: backend_url.into(),
            org_id: token::org_id_from_token(&access_token),
            access_token,
            scopes,
        }
    }

    /// Creates a session whose scopes are read from the token's `scope` claim
    ///
    /// Opaque (non-JWT) tokens produce an empty scope list.
    pub fn from_token(backend_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        let access_token = access_token.into();
        let scopes = token::scopes_from_token(&access_token);
        Self::new(backend_url, access_token, scopes)
    }

    /// Exact-match scope membership; no prefix or hierarchy matching
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }
}

/// Outcome of one probe within one run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeTestResult {
    #[serde(rename = "test")]
    pub case: &'static ScopeTestCase,
    /// Path and query actually requested
    pub request_path: String,
    pub has_scope: bool,
    /// HTTP status, or [`TRANSPORT_FAILURE`]
    pub status: i32,
    pub passed: bool,
    pub message: String,
}

impl ScopeTestResult {
    /// Description of a failing result naming expected and actual status
    ///
    /// Returns `None` for passing results.
    pub fn failure_description(&self) -> Option<String> {
        if self.passed {
            return None;
        }

        let expected = if self.has_scope {
            "2xx or 4xx"
        } else {
            "401"
        };
        Some(format!(
            "[{}] {} ({} {}, scope {}): expected {}, got {} ({})",
            self.case.id,
            self.case.name,
            self.case.method,
            self.request_path,
            self.case.required_scope,
            expected,
            self.status,
            self.message
        ))
    }
}

/// Runs the given probes against the session's backend
///
/// # Arguments
///
/// * `http` - Shared HTTP client
/// * `session` - Backend URL, access token and granted scopes
/// * `cases` - Probes to run, in the order they should execute
///
/// # Returns
///
/// Exactly `cases.len()` results, in the same order as `cases`.
pub async fn run_scope_tests(
    http: &reqwest::Client,
    session: &Session,
    cases: &[&'static ScopeTestCase],
) -> Vec<ScopeTestResult> {
    let base_url = normalize_base_url(&session.backend_url);
    tracing::info!(
        backend = %base_url,
        cases = cases.len(),
        scopes = session.scopes.len(),
        "Starting scope test run"
    );

    let ids = resolve_ids(http, base_url, &session.access_token).await;
    let replacements = placeholder_map(&ids);

    let mut results = Vec::with_capacity(cases.len());
    for &case in cases {
        let org_id = session.org_id.as_deref().filter(|_| case.org_scoped);
        let (query_org_id, body_org_id) = if case.method.sends_body() {
            (None, org_id)
        } else {
            (org_id, None)
        };
        let request_path = materialize(case.path, &replacements, case.query, query_org_id);
        let body = materialize_body(case.body, body_org_id);
        let has_scope = session.has_scope(case.required_scope);

        let (status, Verdict { passed, message }) = match execute_probe(
            http,
            base_url,
            &request_path,
            case.method,
            body.as_deref(),
            &session.access_token,
        )
        .await
        {
            Ok(status) => {
                let status = i32::from(status);
                (status, classify(has_scope, status))
            }
            Err(e) => (
                TRANSPORT_FAILURE,
                Verdict {
                    passed: false,
                    message: e.to_string(),
                },
            ),
        };

        tracing::debug!(
            id = case.id,
            method = %case.method,
            path = %request_path,
            has_scope,
            status,
            passed,
            "Probe finished"
        );

        results.push(ScopeTestResult {
            case,
            request_path,
            has_scope,
            status,
            passed,
            message,
        });
    }

    let passed = results.iter().filter(|r| r.passed).count();
    tracing::info!(passed, total = results.len(), "Scope test run finished");
    results
}

/// Runs the whole registry
pub async fn run_all_scope_tests(
    http: &reqwest::Client,
    session: &Session,
) -> Vec<ScopeTestResult> {
    run_scope_tests(http, session, &all_tests()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::registry::ORG_TESTS;

    fn result(has_scope: bool, status: i32) -> ScopeTestResult {
        let verdict = classify(has_scope, status);
        ScopeTestResult {
            case: &ORG_TESTS[2],
            request_path: "/api/v1/org".to_string(),
            has_scope,
            status,
            passed: verdict.passed,
            message: verdict.message,
        }
    }

    #[test]
    fn test_session_scope_membership_is_exact() {
        let session = Session::new(
            "http://localhost:3000",
            "token",
            vec!["org:read".to_string(), "user".to_string()],
        );
        assert!(session.has_scope("org:read"));
        assert!(!session.has_scope("org"));
        assert!(!session.has_scope("user:read"));
        assert!(!session.has_scope("org:read:all"));
    }

    #[test]
    fn test_session_from_opaque_token_has_no_scopes() {
        let session = Session::from_token("http://localhost:3000", "opaque-token");
        assert!(session.scopes.is_empty());
        assert!(session.org_id.is_none());
    }

    #[test]
    fn test_session_reads_org_id_from_token() {
        let jwt = crate::token::tests::make_jwt(
            serde_json::json!({"scope": "team:write", "orgId": "org-42"}),
        );
        let session = Session::from_token("http://localhost:3000", jwt.clone());
        assert_eq!(session.org_id.as_deref(), Some("org-42"));

        let overridden = Session::new("http://localhost:3000", jwt, vec!["org:read".to_string()]);
        assert_eq!(overridden.org_id.as_deref(), Some("org-42"));
    }

    #[test]
    fn test_failure_description_names_case_and_statuses() {
        let description = result(false, 403).failure_description().unwrap();
        assert!(description.contains("org-admin"));
        assert!(description.contains("DELETE /api/v1/org"));
        assert!(description.contains("expected 401, got 403"));
    }

    #[test]
    fn test_failure_description_with_scope_held() {
        let description = result(true, 500).failure_description().unwrap();
        assert!(description.contains("expected 2xx or 4xx, got 500"));
    }

    #[test]
    fn test_passing_result_has_no_failure_description() {
        assert!(result(false, 401).failure_description().is_none());
    }

    #[test]
    fn test_result_serializes_with_case() {
        let json = serde_json::to_value(result(false, 401)).unwrap();
        assert_eq!(json["test"]["id"], "org-admin");
        assert_eq!(json["test"]["requiredScope"], "org:admin");
        assert_eq!(json["test"]["category"], "Organization");
        assert_eq!(json["test"]["method"], "DELETE");
        assert_eq!(json["hasScope"], false);
        assert_eq!(json["status"], 401);
        assert_eq!(json["passed"], true);
    }
}
