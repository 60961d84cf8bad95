//! Access token inspection
//!
//! Reads the claims of a compact JWT access token without verifying its
//! signature. This is only used to learn which scopes the token claims to
//! carry; the backend remains the authority on whether it accepts them.

use base64::Engine as _;
use serde::Deserialize;

/// Claims scopecheck reads from an access token
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    /// Space-separated scope string
    #[serde(default, deserialize_with = "string_only")]
    pub scope: Option<String>,

    #[serde(default, deserialize_with = "string_or_none")]
    pub org_id: Option<String>,

    #[serde(default, rename = "orgId", deserialize_with = "string_or_none")]
    pub org_id_camel: Option<String>,

    #[serde(default, deserialize_with = "string_or_none")]
    pub sub: Option<String>,
}

impl TokenClaims {
    /// Organization id from `org_id`, falling back to `orgId`
    pub fn org_id(&self) -> Option<&str> {
        self.org_id
            .as_deref()
            .or(self.org_id_camel.as_deref())
            .filter(|id| !id.is_empty())
    }
}

// Claims of an unexpected type are treated as absent rather than failing
// the whole decode.
fn string_only<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

// Identifiers may be numeric; they are normalized to strings.
fn string_or_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Splits a space-separated scope string into scopes
///
/// Empty or whitespace-only input yields an empty list; runs of whitespace
/// are treated as a single separator.
///
/// # Examples
///
/// ```
/// use scopecheck::token::parse_scopes;
///
/// assert_eq!(parse_scopes("org:read  user:read"), vec!["org:read", "user:read"]);
/// assert!(parse_scopes("   ").is_empty());
/// ```
pub fn parse_scopes(scope: &str) -> Vec<String> {
    scope.split_whitespace().map(str::to_string).collect()
}

/// Decodes the payload of a compact JWT
///
/// Returns `None` for opaque tokens and for anything that is not three
/// dot-separated segments with a base64url JSON object in the middle.
/// Padded and unpadded payloads are both accepted.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let mut parts = token.trim().split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let payload = payload.trim_end_matches('=');
    let bytes = match base64::engine::general_purpose::URL_SAFE_NO_PAD.decode(payload) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(error = %e, "Token payload is not base64url");
            return None;
        }
    };

    match serde_json::from_slice::<TokenClaims>(&bytes) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!(error = %e, "Token payload is not a JSON object");
            None
        }
    }
}

/// Scopes claimed by a JWT access token
///
/// Opaque tokens and tokens without a string `scope` claim yield an empty
/// list.
pub fn scopes_from_token(token: &str) -> Vec<String> {
    decode_claims(token)
        .and_then(|claims| claims.scope)
        .map(|scope| parse_scopes(&scope))
        .unwrap_or_default()
}

/// Organization id claimed by a JWT access token
pub fn org_id_from_token(token: &str) -> Option<String> {
    decode_claims(token).and_then(|claims| claims.org_id().map(str::to_string))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds an unsigned compact JWT carrying `claims`
    pub(crate) fn make_jwt(claims: serde_json::Value) -> String {
        let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let header = engine.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = engine.encode(claims.to_string());
        format!("{}.{}.signature", header, payload)
    }

    #[test]
    fn test_parse_scopes_empty_and_whitespace() {
        assert!(parse_scopes("").is_empty());
        assert!(parse_scopes("   \t\n ").is_empty());
    }

    #[test]
    fn test_parse_scopes_irregular_spacing() {
        assert_eq!(
            parse_scopes("org:read  user:read"),
            vec!["org:read".to_string(), "user:read".to_string()]
        );
        assert_eq!(
            parse_scopes("  team:read\tteam:write "),
            vec!["team:read".to_string(), "team:write".to_string()]
        );
    }

    #[test]
    fn test_scopes_from_jwt() {
        let token = make_jwt(serde_json::json!({"scope": "org:read user:read", "sub": "u1"}));
        assert_eq!(
            scopes_from_token(&token),
            vec!["org:read".to_string(), "user:read".to_string()]
        );
    }

    #[test]
    fn test_scopes_from_jwt_without_scope_claim() {
        let token = make_jwt(serde_json::json!({"sub": "u1"}));
        assert!(scopes_from_token(&token).is_empty());
    }

    #[test]
    fn test_scopes_from_jwt_with_non_string_scope() {
        let token = make_jwt(serde_json::json!({"scope": ["org:read"]}));
        assert!(scopes_from_token(&token).is_empty());
    }

    #[test]
    fn test_scopes_from_jwt_with_numeric_scope() {
        let token = make_jwt(serde_json::json!({"scope": 123, "org_id": 7}));
        assert!(scopes_from_token(&token).is_empty());
        assert_eq!(org_id_from_token(&token), Some("7".to_string()));
    }

    #[test]
    fn test_opaque_token_has_no_claims() {
        assert!(decode_claims("opaque-token").is_none());
        assert!(decode_claims("a.b").is_none());
        assert!(decode_claims("a.b.c.d").is_none());
        assert!(scopes_from_token("").is_empty());
    }

    #[test]
    fn test_invalid_payload_has_no_claims() {
        assert!(decode_claims("header.!!!notbase64!!!.sig").is_none());
        let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let not_json = format!("h.{}.s", engine.encode("not json"));
        assert!(decode_claims(&not_json).is_none());
    }

    #[test]
    fn test_padded_payload_is_accepted() {
        let engine = base64::engine::general_purpose::URL_SAFE;
        let payload = engine.encode(r#"{"scope":"org:read"}"#);
        let token = format!("h.{}.s", payload);
        assert_eq!(scopes_from_token(&token), vec!["org:read".to_string()]);
    }

    #[test]
    fn test_org_id_snake_and_camel_case() {
        let snake = make_jwt(serde_json::json!({"org_id": "org-1"}));
        assert_eq!(org_id_from_token(&snake), Some("org-1".to_string()));

        let camel = make_jwt(serde_json::json!({"orgId": "org-2"}));
        assert_eq!(org_id_from_token(&camel), Some("org-2".to_string()));

        let none = make_jwt(serde_json::json!({"scope": "org:read"}));
        assert_eq!(org_id_from_token(&none), None);
    }
}
