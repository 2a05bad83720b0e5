use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use dining_core::AggregateResponse;
use dining_scraper::{AggregateError, StatusService};
use serde::Serialize;
use tokio::task::JoinError;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub service: StatusService,
}

/// Failure payload: a single message and no partial data.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let status_routes = Router::new()
        .route("/api/dining/status", get(dining_status))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ));

    Router::new()
        .route("/api/health", get(health))
        .merge(status_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData { status: "ok" })
}

/// Resolves every venue and returns the aggregate.
///
/// The snapshot runs on its own task so that a panic outside any single
/// venue's resolution becomes a failure payload instead of a dropped
/// connection.
async fn dining_status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<AggregateResponse>, ApiError> {
    let service = state.service.clone();
    let outcome = tokio::spawn(async move { service.snapshot().await }).await;
    snapshot_response(&req_id, outcome)
}

/// Maps the snapshot task's outcome to the boundary response. Failures carry
/// only a message, never partial records.
fn snapshot_response(
    req_id: &RequestId,
    outcome: Result<Result<AggregateResponse, AggregateError>, JoinError>,
) -> Result<Json<AggregateResponse>, ApiError> {
    match outcome {
        Ok(Ok(aggregate)) => Ok(Json(aggregate)),
        Ok(Err(e)) => {
            tracing::error!(request_id = %req_id.0, error = %e, "status aggregation failed");
            Err(ApiError::new(e.to_string()))
        }
        Err(e) => {
            tracing::error!(request_id = %req_id.0, error = %e, "status aggregation task failed");
            Err(ApiError::new("Failed to load dining status"))
        }
    }
}
