//! HTTP front end for the lookup gateway.

use actors::{Gateway, Outcome};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use lookup_core::{JobId, JobResult};
use serde::Serialize;
use tower_http::trace::TraceLayer;

/// Shared state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Gateway,
}

/// Body of a completed lookup.
#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub id: JobId,
    #[serde(rename = "requesttime")]
    pub requested_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: JobResult,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    queue_depth: usize,
    queue_capacity: usize,
}

/// Build the service router.
pub fn router(gateway: Gateway) -> Router {
    Router::new()
        .route("/getinfo", get(getinfo_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { gateway })
}

/// Extract the lookup target from the raw query pairs.
///
/// Exactly one pair, named `target`, is accepted.
fn single_target(params: Vec<(String, String)>) -> Option<String> {
    let mut params = params.into_iter();
    match (params.next(), params.next()) {
        (Some((key, value)), None) if key == "target" => Some(value),
        _ => None,
    }
}

async fn getinfo_handler(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let Some(target) = single_target(params) else {
        tracing::debug!("Rejected malformed lookup query");
        return StatusCode::BAD_REQUEST.into_response();
    };

    match state.gateway.lookup(target).await {
        Outcome::Completed {
            job_id,
            requested_at,
            result,
        } => Json(LookupResponse {
            id: job_id,
            requested_at,
            result,
        })
        .into_response(),
        Outcome::Overloaded => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        Outcome::Timeout => StatusCode::GATEWAY_TIMEOUT.into_response(),
        Outcome::Rejected(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let queue = state.gateway.queue();
    Json(HealthResponse {
        status: "ok",
        queue_depth: queue.len(),
        queue_capacity: queue.capacity(),
    })
}
