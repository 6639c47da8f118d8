//! HTTP request handlers with OpenAPI documentation.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use tracing::error;
use utoipa::OpenApi;

use crate::app::AppState;
use crate::domain::{
    AppError, CreateGoodRequest, CreateGoodResponse, ErrorDetail, ErrorResponse, HealthResponse,
    HealthStatus, RateLimitResponse,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Good Gateway API",
        version = "0.1.0",
        description = "Creates catalog goods through the good middleware and inlines coin metadata",
        license(
            name = "MIT"
        )
    ),
    paths(
        create_good_handler,
        health_check_handler,
        liveness_handler,
        readiness_handler,
    ),
    components(
        schemas(
            CreateGoodRequest,
            CreateGoodResponse,
            crate::domain::GoodInfo,
            crate::domain::Good,
            crate::domain::GoodResponse,
            crate::domain::SupportCoin,
            crate::domain::BenefitType,
            crate::domain::GoodType,
            HealthResponse,
            HealthStatus,
            ErrorResponse,
            ErrorDetail,
            RateLimitResponse,
        )
    ),
    tags(
        (name = "goods", description = "Good management endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// Create a new good
#[utoipa::path(
    post,
    path = "/v1/create/good",
    tag = "goods",
    request_body = CreateGoodRequest,
    responses(
        (status = 200, description = "Good created", body = CreateGoodResponse),
        (status = 400, description = "Request failed validation", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = RateLimitResponse),
        (status = 500, description = "Good middleware or coininfo failure", body = ErrorResponse)
    )
)]
pub async fn create_good_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateGoodRequest>,
) -> Result<Json<CreateGoodResponse>, AppError> {
    let info = state.service.create_good(&payload).await?;
    Ok(Json(CreateGoodResponse { info }))
}

/// Detailed health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Health status", body = HealthResponse)
    )
)]
pub async fn health_check_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let health = state.service.health_check().await;
    Json(health)
}

/// Kubernetes liveness probe
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "health",
    responses(
        (status = 200, description = "Application is alive")
    )
)]
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

/// Kubernetes readiness probe
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Application is ready to serve traffic"),
        (status = 503, description = "Application is not ready")
    )
)]
pub async fn readiness_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    let health = state.service.health_check().await;
    match health.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Prometheus scrape endpoint
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// OpenAPI document
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_type) = if self.is_invalid_argument() {
            (StatusCode::BAD_REQUEST, "invalid_argument")
        } else {
            (StatusCode::INTERNAL_SERVER_ERROR, "internal")
        };
        let message = self.to_string();

        if status.is_server_error() {
            error!(error_type = %error_type, message = %message, "Server error");
        }

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                r#type: error_type.to_string(),
                message,
            },
        });

        (status, body).into_response()
    }
}
