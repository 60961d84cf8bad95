//! Single-probe HTTP execution
//!
//! A probe is one authenticated request whose only observable output is the
//! response status. Every status code is a valid outcome; an error is
//! returned only when no status was obtained at all.

use crate::error::ScopeCheckError;
use crate::harness::registry::HttpMethod;

/// Body sent by non-GET probes that declare none
pub const EMPTY_JSON_BODY: &str = "{}";

/// `Authorization` header value for a bearer token
pub(crate) fn bearer(access_token: &str) -> String {
    format!("Bearer {}", access_token)
}

/// Strips trailing slashes from a base URL
pub fn normalize_base_url(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}

/// Issues the request for one probe and returns its status code
///
/// # Arguments
///
/// * `http` - Shared HTTP client
/// * `base_url` - Backend base URL; trailing slashes are ignored
/// * `path_and_query` - Materialized path including any query suffix
/// * `method` - Request method
/// * `body` - JSON body for non-GET methods; `{}` when `None`
/// * `access_token` - Bearer token
///
/// # Errors
///
/// Returns [`ScopeCheckError::Transport`] when the request fails before a
/// response arrives (DNS failure, refused connection, timeout).
pub async fn execute_probe(
    http: &reqwest::Client,
    base_url: &str,
    path_and_query: &str,
    method: HttpMethod,
    body: Option<&str>,
    access_token: &str,
) -> Result<u16, ScopeCheckError> {
    let url = format!("{}{}", normalize_base_url(base_url), path_and_query);

    let mut request = http
        .request(method.into(), &url)
        .header(reqwest::header::AUTHORIZATION, bearer(access_token));

    if method.sends_body() {
        request = request
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.unwrap_or(EMPTY_JSON_BODY).to_string());
    }

    let response = request
        .send()
        .await
        .map_err(|e| ScopeCheckError::Transport(format!("{} {}: {}", method, url, e)))?;

    Ok(response.status().as_u16())
}
