//! Static catalog of scope probes
//!
//! Every `(method, path template, scope)` triple the harness verifies is
//! declared here exactly once, grouped by resource category. The combined
//! list is the concatenation of the category lists in a fixed order:
//! Organization, Users, User Groups, Teams.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ScopeCheckError;
use crate::harness::materialize::{GROUP_ID, TEAM_ID, USER_ID};

/// HTTP method used by a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Upper-case method name as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Whether requests with this method carry a JSON body
    pub fn sends_body(&self) -> bool {
        !matches!(self, Self::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Resource category a probe belongs to
///
/// Categories only group probes for reporting and for running a subset;
/// they have no effect on how a probe is executed or classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    #[serde(rename = "Organization")]
    Organization,
    #[serde(rename = "Users")]
    Users,
    #[serde(rename = "User Groups")]
    UserGroups,
    #[serde(rename = "Teams")]
    Teams,
}

impl Category {
    /// All categories in registry order
    pub const ALL: [Category; 4] = [
        Category::Organization,
        Category::Users,
        Category::UserGroups,
        Category::Teams,
    ];

    /// Human-readable label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Organization => "Organization",
            Self::Users => "Users",
            Self::UserGroups => "User Groups",
            Self::Teams => "Teams",
        }
    }

    /// Short name accepted on the command line and in query strings
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Organization => "org",
            Self::Users => "users",
            Self::UserGroups => "user-groups",
            Self::Teams => "teams",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = ScopeCheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "org" | "organization" => Ok(Self::Organization),
            "users" | "user" => Ok(Self::Users),
            "user-groups" | "user_groups" | "usergroups" | "user groups" | "groups" => {
                Ok(Self::UserGroups)
            }
            "teams" | "team" => Ok(Self::Teams),
            _ => Err(ScopeCheckError::InvalidCategory(s.to_string())),
        }
    }
}

/// One probe definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeTestCase {
    /// Unique short identifier
    pub id: &'static str,
    /// Human-readable label
    pub name: &'static str,
    pub method: HttpMethod,
    /// Path template, may contain placeholder tokens
    pub path: &'static str,
    /// The single scope the backend is expected to demand
    pub required_scope: &'static str,
    pub category: Category,
    /// Ordered query parameters appended to the request URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<&'static [(&'static str, &'static str)]>,
    /// Literal JSON body for non-GET methods
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<&'static str>,
    /// Whether the token's organization id is sent along: as an `orgId`
    /// query parameter for GET, as an `orgId` body field otherwise
    pub org_scoped: bool,
}

/// Organization probes
pub static ORG_TESTS: &[ScopeTestCase] = &[
    ScopeTestCase {
        id: "org-read",
        name: "Get organization",
        method: HttpMethod::Get,
        path: "/api/v1/org",
        required_scope: "org:read",
        category: Category::Organization,
        query: None,
        body: None,
        org_scoped: false,
    },
    ScopeTestCase {
        id: "org-write",
        name: "Update organization",
        method: HttpMethod::Put,
        path: "/api/v1/org",
        required_scope: "org:write",
        category: Category::Organization,
        query: None,
        body: Some(r#"{"name":"Org"}"#),
        org_scoped: false,
    },
    ScopeTestCase {
        id: "org-admin",
        name: "Delete organization",
        method: HttpMethod::Delete,
        path: "/api/v1/org",
        required_scope: "org:admin",
        category: Category::Organization,
        query: None,
        body: None,
        org_scoped: false,
    },
];

/// User probes
pub static USER_TESTS: &[ScopeTestCase] = &[
    ScopeTestCase {
        id: "users-list",
        name: "List users",
        method: HttpMethod::Get,
        path: "/api/v1/users",
        required_scope: "user:read",
        category: Category::Users,
        query: None,
        body: None,
        org_scoped: false,
    },
    ScopeTestCase {
        id: "users-get",
        name: "Get user by id",
        method: HttpMethod::Get,
        path: "/api/v1/users/{userId}",
        required_scope: "user:read",
        category: Category::Users,
        query: None,
        body: None,
        org_scoped: false,
    },
    ScopeTestCase {
        id: "users-invite",
        name: "Invite user",
        method: HttpMethod::Post,
        path: "/api/v1/users",
        required_scope: "user:invite",
        category: Category::Users,
        query: None,
        body: Some(r#"{"fullName":"User","email":"user@example.com"}"#),
        org_scoped: true,
    },
    ScopeTestCase {
        id: "users-update",
        name: "Update user",
        method: HttpMethod::Put,
        path: "/api/v1/users/{userId}",
        required_scope: "user:write",
        category: Category::Users,
        query: None,
        body: Some(r#"{"fullName":"User Updated"}"#),
        org_scoped: true,
    },
    ScopeTestCase {
        id: "users-delete",
        name: "Delete user",
        method: HttpMethod::Delete,
        path: "/api/v1/users/{userId}",
        required_scope: "user:delete",
        category: Category::Users,
        query: None,
        body: None,
        org_scoped: false,
    },
];

/// User group probes
pub static USER_GROUP_TESTS: &[ScopeTestCase] = &[
    ScopeTestCase {
        id: "user-groups-list",
        name: "List user groups",
        method: HttpMethod::Get,
        path: "/api/v1/userGroups",
        required_scope: "usergroup:read",
        category: Category::UserGroups,
        query: None,
        body: None,
        org_scoped: false,
    },
    ScopeTestCase {
        id: "user-groups-create",
        name: "Create user group",
        method: HttpMethod::Post,
        path: "/api/v1/userGroups",
        required_scope: "usergroup:write",
        category: Category::UserGroups,
        query: None,
        body: Some(r#"{"name":"Group","type":"standard"}"#),
        org_scoped: true,
    },
    ScopeTestCase {
        id: "user-groups-update",
        name: "Update user group",
        method: HttpMethod::Put,
        path: "/api/v1/userGroups/{groupId}",
        required_scope: "usergroup:write",
        category: Category::UserGroups,
        query: None,
        body: Some(r#"{"name":"Group Updated","type":"standard"}"#),
        org_scoped: true,
    },
];

/// Team probes
pub static TEAM_TESTS: &[ScopeTestCase] = &[
    ScopeTestCase {
        id: "teams-list",
        name: "List teams",
        method: HttpMethod::Get,
        path: "/api/v1/teams",
        required_scope: "team:read",
        category: Category::Teams,
        query: Some(&[("page", "1"), ("limit", "10")]),
        body: None,
        org_scoped: true,
    },
    ScopeTestCase {
        id: "teams-create",
        name: "Create team",
        method: HttpMethod::Post,
        path: "/api/v1/teams",
        required_scope: "team:write",
        category: Category::Teams,
        query: None,
        body: Some(r#"{"name":"Team"}"#),
        org_scoped: true,
    },
    ScopeTestCase {
        id: "teams-update",
        name: "Update team",
        method: HttpMethod::Put,
        path: "/api/v1/teams/{teamId}",
        required_scope: "team:write",
        category: Category::Teams,
        query: None,
        body: Some(r#"{"name":"Team Updated"}"#),
        org_scoped: true,
    },
];

/// Probes for a single category
pub fn tests_for(category: Category) -> &'static [ScopeTestCase] {
    match category {
        Category::Organization => ORG_TESTS,
        Category::Users => USER_TESTS,
        Category::UserGroups => USER_GROUP_TESTS,
        Category::Teams => TEAM_TESTS,
    }
}

/// Every probe in registry order
pub fn all_tests() -> Vec<&'static ScopeTestCase> {
    Category::ALL
        .iter()
        .flat_map(|category| tests_for(*category).iter())
        .collect()
}

/// Probes for an optional category filter
///
/// `None` selects the whole registry.
pub fn select(category: Option<Category>) -> Vec<&'static ScopeTestCase> {
    match category {
        Some(category) => tests_for(category).iter().collect(),
        None => all_tests(),
    }
}

/// The placeholder tokens path templates may use
pub fn placeholder_tokens() -> [&'static str; 3] {
    [USER_ID, GROUP_ID, TEAM_ID]
}
