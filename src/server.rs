//! HTTP report server
//!
//! Serves the scope test report as an HTML page and as JSON. Every request
//! performs its own independent run against the backend; nothing is cached
//! between requests.
//!
//! Routes:
//!
//! - `GET /` -- HTML report, optional `?category=<name>` filter
//! - `GET /api/scope-tests` -- JSON report, same filter
//! - `GET /health` -- liveness check

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::error::{Result, ScopeCheckError};
use crate::harness::{self, Category, Session};
use crate::report;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub http: reqwest::Client,
    /// `None` when no access token is configured
    pub session: Option<Arc<Session>>,
}

impl AppState {
    pub fn new(http: reqwest::Client, session: Option<Session>) -> Self {
        Self {
            http,
            session: session.map(Arc::new),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub category: Option<String>,
}

impl ReportQuery {
    fn category(&self) -> std::result::Result<Option<Category>, ScopeCheckError> {
        self.category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .map(str::parse)
            .transpose()
    }
}

/// Builds the report router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(report_page))
        .route("/api/scope-tests", get(report_json))
        .route("/health", get(health))
        .with_state(state)
}

/// Binds `addr` and serves the report until the process is stopped
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Scope test report available at http://{}/", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

async fn report_page(State(state): State<AppState>, Query(query): Query<ReportQuery>) -> Response {
    let category = match query.category() {
        Ok(category) => category,
        Err(e) => {
            let body = format!("<p>{}</p>", report::escape_html(&e.to_string()));
            return (StatusCode::BAD_REQUEST, Html(body)).into_response();
        }
    };

    let Some(session) = state.session.as_deref() else {
        return Html(report::render_missing_token_html()).into_response();
    };

    let results = harness::run_scope_tests(&state.http, session, &harness::select(category)).await;
    Html(report::render_html(session, &results, category)).into_response()
}

async fn report_json(State(state): State<AppState>, Query(query): Query<ReportQuery>) -> Response {
    let category = match query.category() {
        Ok(category) => category,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    };

    let Some(session) = state.session.as_deref() else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": ScopeCheckError::MissingToken.to_string() })),
        )
            .into_response();
    };

    let results = harness::run_scope_tests(&state.http, session, &harness::select(category)).await;
    Json(report::Report::new(session, &results)).into_response()
}
