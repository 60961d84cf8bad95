//! Rendering of scope test results
//!
//! The same result list is rendered three ways: a terminal table for the
//! `run` command, JSON for scripting and the HTTP API, and a standalone HTML
//! page for the report server.

use chrono::{DateTime, Utc};
use colored::Colorize;
use prettytable::{format, row, Table};
use serde::Serialize;

use crate::harness::{Category, ScopeTestResult, Session};

/// Pass/fail counts for a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl Summary {
    /// Counts passing and failing results
    pub fn from_results(results: &[ScopeTestResult]) -> Self {
        let passed = results.iter().filter(|r| r.passed).count();
        Self {
            total: results.len(),
            passed,
            failed: results.len() - passed,
        }
    }

    /// Whether every result passed
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// JSON document for a run
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report<'a> {
    pub generated_at: DateTime<Utc>,
    pub summary: Summary,
    pub scopes: &'a [String],
    pub results: &'a [ScopeTestResult],
}

impl<'a> Report<'a> {
    pub fn new(session: &'a Session, results: &'a [ScopeTestResult]) -> Self {
        Self {
            generated_at: Utc::now(),
            summary: Summary::from_results(results),
            scopes: &session.scopes,
            results,
        }
    }
}

/// Results grouped by category, in registry order, skipping empty groups
pub fn group_by_category(
    results: &[ScopeTestResult],
) -> Vec<(Category, Vec<&ScopeTestResult>)> {
    Category::ALL
        .iter()
        .filter_map(|category| {
            let group: Vec<&ScopeTestResult> = results
                .iter()
                .filter(|r| r.case.category == *category)
                .collect();
            (!group.is_empty()).then_some((*category, group))
        })
        .collect()
}

fn status_text(status: i32) -> String {
    if status < 0 {
        "ERR".to_string()
    } else {
        status.to_string()
    }
}

/// Prints the terminal report
pub fn print_table(session: &Session, results: &[ScopeTestResult]) {
    let scopes = if session.scopes.is_empty() {
        "(none)".to_string()
    } else {
        session.scopes.join(", ")
    };
    println!("\nBackend: {}", session.backend_url);
    println!("Token scopes: {}", scopes);

    for (category, group) in group_by_category(results) {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
        table.add_row(row![
            "Name".bold(),
            "Request".bold(),
            "Scope".bold(),
            "Has Scope".bold(),
            "Status".bold(),
            "Result".bold(),
            "Message".bold()
        ]);

        for result in group {
            let verdict = if result.passed {
                "PASS".green()
            } else {
                "FAIL".red()
            };
            let request = format!("{} {}", result.case.method, result.request_path);
            let has_scope = if result.has_scope { "yes" } else { "no" };
            table.add_row(row![
                result.case.name,
                request,
                result.case.required_scope,
                has_scope,
                status_text(result.status),
                verdict,
                result.message
            ]);
        }

        println!("\n{}:", category.label().cyan());
        table.printstd();
    }

    let summary = Summary::from_results(results);
    let line = format!("{}/{} passed", summary.passed, summary.total);
    if summary.all_passed() {
        println!("\n{}\n", line.green());
    } else {
        println!("\n{}\n", line.red());
    }
}

/// Pretty-printed JSON report
pub fn to_json(session: &Session, results: &[ScopeTestResult]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Report::new(session, results))
}

/// Escapes text for inclusion in HTML
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const STYLE: &str = "body{font-family:sans-serif;margin:2rem;color:#222}\
table{border-collapse:collapse;width:100%;margin-bottom:1.5rem}\
th,td{border:1px solid #ccc;padding:.4rem .6rem;text-align:left;font-size:.9rem}\
th{background:#f4f4f4}.pass{color:#1a7f37;font-weight:bold}\
.fail{color:#cf222e;font-weight:bold}code{font-size:.85rem}\
nav a{margin-right:1rem}";

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(title),
        STYLE,
        body
    )
}

fn category_nav(selected: Option<Category>) -> String {
    let mut nav = String::from("<nav>");
    let all_label = if selected.is_none() { "<b>All</b>" } else { "All" };
    nav.push_str(&format!("<a href=\"/\">{}</a>", all_label));
    for category in Category::ALL {
        let label = if selected == Some(category) {
            format!("<b>{}</b>", category.label())
        } else {
            category.label().to_string()
        };
        nav.push_str(&format!(
            "<a href=\"/?category={}\">{}</a>",
            category.slug(),
            label
        ));
    }
    nav.push_str("</nav>\n");
    nav
}

/// Full HTML report page
///
/// `selected` is the active category filter, used to highlight navigation.
pub fn render_html(
    session: &Session,
    results: &[ScopeTestResult],
    selected: Option<Category>,
) -> String {
    let summary = Summary::from_results(results);
    let mut body = String::new();

    body.push_str("<h1>OAuth Scope Tests</h1>\n");
    body.push_str(&category_nav(selected));
    body.push_str(&format!(
        "<p>Backend: <code>{}</code></p>\n",
        escape_html(&session.backend_url)
    ));
    let scopes = if session.scopes.is_empty() {
        "(none)".to_string()
    } else {
        escape_html(&session.scopes.join(" "))
    };
    body.push_str(&format!("<p>Token scopes: <code>{}</code></p>\n", scopes));
    body.push_str(&format!(
        "<p>Generated: {}</p>\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    body.push_str(&format!(
        "<p class=\"{}\">{}/{} passed</p>\n",
        if summary.all_passed() { "pass" } else { "fail" },
        summary.passed,
        summary.total
    ));

    for (category, group) in group_by_category(results) {
        body.push_str(&format!("<h2>{}</h2>\n<table>\n", category.label()));
        body.push_str(
            "<tr><th>Category</th><th>Name</th><th>Request</th><th>Required Scope</th>\
             <th>Has Scope</th><th>Status</th><th>Result</th><th>Message</th></tr>\n",
        );
        for result in group {
            let (class, verdict) = if result.passed {
                ("pass", "PASS")
            } else {
                ("fail", "FAIL")
            };
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td><code>{} {}</code></td><td><code>{}</code></td>\
                 <td>{}</td><td>{}</td><td class=\"{}\">{}</td><td>{}</td></tr>\n",
                category.label(),
                escape_html(result.case.name),
                result.case.method,
                escape_html(&result.request_path),
                escape_html(result.case.required_scope),
                if result.has_scope { "yes" } else { "no" },
                status_text(result.status),
                class,
                verdict,
                escape_html(&result.message)
            ));
        }
        body.push_str("</table>\n");
    }

    page("OAuth Scope Tests", &body)
}

/// HTML page shown when no access token is configured
pub fn render_missing_token_html() -> String {
    page(
        "OAuth Scope Tests",
        "<h1>OAuth Scope Tests</h1>\n<p>No access token is configured. \
         Set <code>ACCESS_TOKEN</code> or start the server with <code>--token</code>.</p>\n",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::classify;
    use crate::harness::registry::{ORG_TESTS, TEAM_TESTS};

    fn session() -> Session {
        Session::new(
            "http://localhost:3000",
            "token",
            vec!["org:read".to_string()],
        )
    }

    fn results() -> Vec<ScopeTestResult> {
        let make = |case, has_scope, status| {
            let verdict = classify(has_scope, status);
            ScopeTestResult {
                case,
                request_path: "/api/v1/x".to_string(),
                has_scope,
                status,
                passed: verdict.passed,
                message: verdict.message,
            }
        };
        vec![
            make(&ORG_TESTS[0], true, 200),
            make(&ORG_TESTS[2], false, 403),
            make(&TEAM_TESTS[0], false, 401),
        ]
    }

    #[test]
    fn test_summary_counts() {
        let summary = Summary::from_results(&results());
        assert_eq!(
            summary,
            Summary {
                total: 3,
                passed: 2,
                failed: 1
            }
        );
        assert!(!summary.all_passed());
        assert!(Summary::from_results(&[]).all_passed());
    }

    #[test]
    fn test_group_by_category_skips_empty_groups() {
        let results = results();
        let groups = group_by_category(&results);
        let categories: Vec<Category> = groups.iter().map(|(c, _)| *c).collect();
        assert_eq!(categories, vec![Category::Organization, Category::Teams]);
        assert_eq!(groups[0].1.len(), 2);
    }

    #[test]
    fn test_json_report_contains_summary_and_results() {
        let results = results();
        let json: serde_json::Value =
            serde_json::from_str(&to_json(&session(), &results).unwrap()).unwrap();
        assert_eq!(json["summary"]["total"], 3);
        assert_eq!(json["summary"]["failed"], 1);
        assert_eq!(json["scopes"][0], "org:read");
        assert!(json["generatedAt"].is_string());
        assert_eq!(json["results"].as_array().unwrap().len(), 3);
        assert_eq!(json["results"][1]["message"], "Expected 401, got 403");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_render_html_has_rows_and_summary() {
        let html = render_html(&session(), &results(), None);
        assert!(html.contains("2/3 passed"));
        assert!(html.contains("<h2>Organization</h2>"));
        assert!(html.contains("<h2>Teams</h2>"));
        assert!(!html.contains("<h2>Users</h2>"));
        assert!(html.contains("Expected 401, got 403"));
        assert_eq!(html.matches("class=\"pass\">PASS").count(), 2);
        assert_eq!(html.matches("class=\"fail\">FAIL").count(), 1);
    }

    #[test]
    fn test_render_html_escapes_messages() {
        let mut results = results();
        results[0].message = "<script>alert(1)</script>".to_string();
        let html = render_html(&session(), &results, Some(Category::Organization));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("<b>Organization</b>"));
    }

    #[test]
    fn test_status_text_for_transport_failure() {
        assert_eq!(status_text(-1), "ERR");
        assert_eq!(status_text(404), "404");
    }
}
