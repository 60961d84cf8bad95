//! Best-effort resolution of live resource identifiers
//!
//! Identifier-dependent probes (get-by-id, update, delete) should hit a real
//! resource, so before a run the harness lists users, user groups and teams
//! and keeps the first identifier of each. Every lookup is independent: a
//! failed lookup yields `None` for that kind only and never aborts the run.

use serde_json::Value;

use crate::harness::executor::bearer;

/// Resource kinds whose identifiers path templates can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    User,
    Group,
    Team,
}

impl ResourceKind {
    /// All kinds, in resolution order
    pub const ALL: [ResourceKind; 3] = [ResourceKind::User, ResourceKind::Group, ResourceKind::Team];

    /// List endpoint (path plus query) queried for this kind
    pub fn list_endpoint(&self) -> &'static str {
        match self {
            Self::User => "/api/v1/users",
            Self::Group => "/api/v1/userGroups",
            Self::Team => "/api/v1/teams?page=1&limit=10",
        }
    }

    /// Wrapper fields that may carry the list, tried in order
    fn list_fields(&self) -> &'static [&'static str] {
        match self {
            Self::User => &["data", "users"],
            Self::Group => &["data", "userGroups"],
            Self::Team => &["data", "teams"],
        }
    }
}

/// Identifiers resolved for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedIds {
    pub user: Option<String>,
    pub group: Option<String>,
    pub team: Option<String>,
}

impl ResolvedIds {
    /// Identifier resolved for `kind`, if any
    pub fn get(&self, kind: ResourceKind) -> Option<&str> {
        match kind {
            ResourceKind::User => self.user.as_deref(),
            ResourceKind::Group => self.group.as_deref(),
            ResourceKind::Team => self.team.as_deref(),
        }
    }
}

/// Lists users, user groups and teams and keeps one identifier of each
///
/// The three requests are issued concurrently. Transport errors, non-200
/// statuses, empty lists and unexpected shapes all resolve to `None` for
/// the affected kind.
///
/// # Arguments
///
/// * `http` - Shared HTTP client
/// * `base_url` - Backend base URL without trailing slash
/// * `access_token` - Bearer token sent with every lookup
pub async fn resolve_ids(http: &reqwest::Client, base_url: &str, access_token: &str) -> ResolvedIds {
    let (user, group, team) = futures::future::join3(
        resolve_one(http, base_url, access_token, ResourceKind::User),
        resolve_one(http, base_url, access_token, ResourceKind::Group),
        resolve_one(http, base_url, access_token, ResourceKind::Team),
    )
    .await;

    let ids = ResolvedIds { user, group, team };
    tracing::debug!(
        user = ids.user.is_some(),
        group = ids.group.is_some(),
        team = ids.team.is_some(),
        "Resolved resource identifiers"
    );
    ids
}

async fn resolve_one(
    http: &reqwest::Client,
    base_url: &str,
    access_token: &str,
    kind: ResourceKind,
) -> Option<String> {
    let url = format!("{}{}", base_url, kind.list_endpoint());

    let response = match http
        .get(&url)
        .header(reqwest::header::AUTHORIZATION, bearer(access_token))
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!(?kind, error = %e, "Identifier lookup failed");
            return None;
        }
    };

    if response.status() != reqwest::StatusCode::OK {
        tracing::debug!(?kind, status = response.status().as_u16(), "Identifier lookup not OK");
        return None;
    }

    let body: Value = match response.json().await {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!(?kind, error = %e, "Identifier lookup returned invalid JSON");
            return None;
        }
    };

    first_id(&body, kind.list_fields())
}

/// Extracts the identifier of the first list element
///
/// `body` may be a bare array or an object carrying the array under one of
/// `fields`; the first field holding a non-empty array wins, so an empty
/// wrapper falls through to the next field. The identifier is read
/// from `id`, falling back to `_id`, and normalized to a string.
pub fn first_id(body: &Value, fields: &[&str]) -> Option<String> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(map) => fields
            .iter()
            .find_map(|field| {
                map.get(*field)
                    .and_then(Value::as_array)
                    .filter(|items| !items.is_empty())
            })?,
        _ => return None,
    };

    let first = items.first()?;
    ["id", "_id"]
        .iter()
        .find_map(|field| first.get(*field).and_then(id_to_string))
}

fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_id_from_bare_array() {
        let body = json!([{"id": "u1"}, {"id": "u2"}]);
        assert_eq!(first_id(&body, &["data"]), Some("u1".to_string()));
    }

    #[test]
    fn test_first_id_from_generic_wrapper() {
        let body = json!({"data": [{"id": "t1"}], "total": 1});
        assert_eq!(first_id(&body, &["data", "teams"]), Some("t1".to_string()));
    }

    #[test]
    fn test_first_id_from_resource_field() {
        let body = json!({"userGroups": [{"_id": "g1"}]});
        assert_eq!(
            first_id(&body, &["data", "userGroups"]),
            Some("g1".to_string())
        );
    }

    #[test]
    fn test_first_id_skips_non_array_wrapper() {
        let body = json!({"data": {"page": 1}, "teams": [{"id": "t9"}]});
        assert_eq!(first_id(&body, &["data", "teams"]), Some("t9".to_string()));
    }

    #[test]
    fn test_first_id_skips_empty_wrapper() {
        let body = json!({"data": [], "users": [{"id": "u1"}]});
        assert_eq!(first_id(&body, &["data", "users"]), Some("u1".to_string()));
    }

    #[test]
    fn test_first_id_prefers_id_over_underscore_id() {
        let body = json!([{"_id": "mongo", "id": "plain"}]);
        assert_eq!(first_id(&body, &[]), Some("plain".to_string()));
    }

    #[test]
    fn test_first_id_normalizes_numbers() {
        let body = json!([{"id": 42}]);
        assert_eq!(first_id(&body, &[]), Some("42".to_string()));
    }

    #[test]
    fn test_first_id_empty_list() {
        assert_eq!(first_id(&json!([]), &[]), None);
        assert_eq!(first_id(&json!({"data": []}), &["data"]), None);
    }

    #[test]
    fn test_first_id_missing_identifier() {
        assert_eq!(first_id(&json!([{"name": "nobody"}]), &[]), None);
    }

    #[test]
    fn test_first_id_malformed_shape() {
        assert_eq!(first_id(&json!("users"), &["data"]), None);
        assert_eq!(first_id(&json!({"unrelated": [1]}), &["data"]), None);
    }

    #[test]
    fn test_resolved_ids_get() {
        let ids = ResolvedIds {
            user: Some("u".to_string()),
            group: None,
            team: Some("t".to_string()),
        };
        assert_eq!(ids.get(ResourceKind::User), Some("u"));
        assert_eq!(ids.get(ResourceKind::Group), None);
        assert_eq!(ids.get(ResourceKind::Team), Some("t"));
    }
}
