//! Path and query materialization
//!
//! Turns a probe's path template into the concrete path sent on the wire.
//! Placeholder tokens are replaced by resolved identifiers; a token whose
//! identifier was not resolved is left as-is, so the probe targets a
//! literal (and necessarily missing) resource instead of failing early.
//!
//! Probes scoped to an organization also carry the token's organization id,
//! as an `orgId` query parameter or an `orgId` field of the JSON body.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::harness::executor::EMPTY_JSON_BODY;
use crate::harness::resolver::{ResolvedIds, ResourceKind};

/// Query parameter and body field carrying the organization id
pub const ORG_ID_FIELD: &str = "orgId";

/// Placeholder standing in for a live user id
pub const USER_ID: &str = "{userId}";
/// Placeholder standing in for a live user group id
pub const GROUP_ID: &str = "{groupId}";
/// Placeholder standing in for a live team id
pub const TEAM_ID: &str = "{teamId}";

/// Placeholder token used for a resource kind
pub fn placeholder(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::User => USER_ID,
        ResourceKind::Group => GROUP_ID,
        ResourceKind::Team => TEAM_ID,
    }
}

/// Builds the placeholder → replacement map for a run
///
/// Unresolved slots map to their own placeholder text.
///
/// # Examples
///
/// ```
/// use scopecheck::harness::materialize::{placeholder_map, USER_ID, TEAM_ID};
/// use scopecheck::harness::resolver::ResolvedIds;
///
/// let ids = ResolvedIds {
///     user: Some("abc123".to_string()),
///     ..Default::default()
/// };
/// let map = placeholder_map(&ids);
/// assert_eq!(map[USER_ID], "abc123");
/// assert_eq!(map[TEAM_ID], TEAM_ID);
/// ```
pub fn placeholder_map(ids: &ResolvedIds) -> BTreeMap<&'static str, String> {
    ResourceKind::ALL
        .iter()
        .map(|kind| {
            let token = placeholder(*kind);
            let value = ids
                .get(*kind)
                .map(str::to_string)
                .unwrap_or_else(|| token.to_string());
            (token, value)
        })
        .collect()
}

/// Substitutes every placeholder occurring in `template`
pub fn materialize_path(template: &str, replacements: &BTreeMap<&'static str, String>) -> String {
    replacements
        .iter()
        .fold(template.to_string(), |path, (token, value)| {
            path.replace(token, value)
        })
}

/// Encodes an ordered query mapping as a `?k=v&...` suffix
///
/// Keys and values are percent-encoded. Returns the empty string when no
/// query is declared.
pub fn encode_query(query: Option<&[(&str, &str)]>) -> String {
    match query {
        Some(pairs) if !pairs.is_empty() => {
            let encoded: Vec<String> = pairs
                .iter()
                .map(|(key, value)| {
                    format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
                })
                .collect();
            format!("?{}", encoded.join("&"))
        }
        _ => String::new(),
    }
}

/// Materialized path plus query suffix for one template
///
/// When `org_id` is given it is appended as a trailing `orgId` parameter,
/// after the declared query.
pub fn materialize(
    template: &str,
    replacements: &BTreeMap<&'static str, String>,
    query: Option<&[(&str, &str)]>,
    org_id: Option<&str>,
) -> String {
    let mut pairs: Vec<(&str, &str)> = query.unwrap_or_default().to_vec();
    if let Some(org_id) = org_id {
        pairs.push((ORG_ID_FIELD, org_id));
    }

    format!(
        "{}{}",
        materialize_path(template, replacements),
        encode_query(Some(pairs.as_slice()))
    )
}

/// Request body for one probe, with `orgId` merged in when given
///
/// A missing body counts as `{}`. Bodies that are not JSON objects are sent
/// unchanged.
pub fn materialize_body(body: Option<&str>, org_id: Option<&str>) -> Option<String> {
    let Some(org_id) = org_id else {
        return body.map(str::to_string);
    };

    let mut value: Value = match serde_json::from_str(body.unwrap_or(EMPTY_JSON_BODY)) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "Probe body is not JSON, sending it without orgId");
            return body.map(str::to_string);
        }
    };

    match value.as_object_mut() {
        Some(object) => {
            object.insert(ORG_ID_FIELD.to_string(), Value::String(org_id.to_string()));
            Some(value.to_string())
        }
        None => body.map(str::to_string),
    }
}
