//! HTTP routing configuration with rate limiting and OpenAPI documentation.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderValue, Request, Response, StatusCode},
    middleware::{self, Next},
    response::IntoResponse,
    routing::{get, post},
};
use governor::{Quota, RateLimiter};
use tower::ServiceBuilder;
use tower_http::{
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::app::AppState;
use crate::domain::{ErrorDetail, ErrorResponse, RateLimitResponse};

use super::handlers::{
    create_good_handler, health_check_handler, liveness_handler, metrics_handler,
    openapi_handler, readiness_handler,
};

/// Whole-request timeout used when none is configured
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(35);

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests per second for good endpoints
    pub general_rps: u32,
    /// Burst size for good endpoints
    pub general_burst: u32,
    /// Requests per second for health endpoints
    pub health_rps: u32,
    /// Burst size for health endpoints
    pub health_burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            general_rps: 10,
            general_burst: 20,
            health_rps: 100,
            health_burst: 100,
        }
    }
}

impl RateLimitConfig {
    /// Config with the given good-endpoint limits and default health limits
    pub fn new(general_rps: u32, general_burst: u32) -> Self {
        Self {
            general_rps,
            general_burst,
            ..Self::default()
        }
    }
}

type KeyedLimiter = governor::RateLimiter<
    IpAddr,
    governor::state::keyed::DashMapStateStore<IpAddr>,
    governor::clock::DefaultClock,
>;

/// Shared rate limiter state (keyed by client IP to prevent global DoS)
pub struct RateLimitState {
    goods_limiter: KeyedLimiter,
    health_limiter: KeyedLimiter,
    config: RateLimitConfig,
}

fn quota(rps: u32, burst: u32) -> Quota {
    let rps = NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN);
    let burst = NonZeroU32::new(burst).unwrap_or(NonZeroU32::MIN);
    Quota::per_second(rps).allow_burst(burst)
}

impl RateLimitState {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            goods_limiter: RateLimiter::dashmap(quota(config.general_rps, config.general_burst)),
            health_limiter: RateLimiter::dashmap(quota(config.health_rps, config.health_burst)),
            config,
        }
    }
}

/// Extract client IP from request (X-Forwarded-For, X-Real-IP, or ConnectInfo).
/// Falls back to 0.0.0.0 when unknown; unknown clients share one bucket.
fn client_ip_from_request<B>(request: &Request<B>) -> IpAddr {
    let header_ip = |name: &str| {
        request
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
    };

    header_ip("x-forwarded-for")
        .or_else(|| header_ip("x-real-ip"))
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip())
        })
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Rate limit middleware for good endpoints (per-IP to prevent global DoS)
async fn rate_limit_goods_middleware(
    State(rate_limit): State<Arc<RateLimitState>>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let client_ip = client_ip_from_request(&request);
    let limit = HeaderValue::from(rate_limit.config.general_rps);

    match rate_limit.goods_limiter.check_key(&client_ip) {
        Ok(_) => {
            let mut response = next.run(request).await;
            response.headers_mut().insert("X-RateLimit-Limit", limit);
            response
        }
        Err(not_until) => {
            let wait_time = not_until.wait_time_from(governor::clock::Clock::now(
                &governor::clock::DefaultClock::default(),
            ));
            let retry_after = wait_time.as_secs();

            let body = RateLimitResponse {
                error: ErrorDetail {
                    r#type: "rate_limited".to_string(),
                    message: "Rate limit exceeded. Please slow down your requests.".to_string(),
                },
                retry_after,
            };

            let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
            let headers = response.headers_mut();
            headers.insert("X-RateLimit-Limit", limit);
            headers.insert("X-RateLimit-Remaining", HeaderValue::from_static("0"));
            headers.insert("Retry-After", HeaderValue::from(retry_after));
            response
        }
    }
}

/// Rate limit middleware for health endpoints (per-IP to prevent global DoS)
async fn rate_limit_health_middleware(
    State(rate_limit): State<Arc<RateLimitState>>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let client_ip = client_ip_from_request(&request);
    match rate_limit.health_limiter.check_key(&client_ip) {
        Ok(_) => next.run(request).await,
        Err(not_until) => {
            let wait_time = not_until.wait_time_from(governor::clock::Clock::now(
                &governor::clock::DefaultClock::default(),
            ));
            let retry_after = wait_time.as_secs();

            let body = ErrorResponse {
                error: ErrorDetail {
                    r#type: "rate_limited".to_string(),
                    message: "Rate limit exceeded".to_string(),
                },
            };

            let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
            response
                .headers_mut()
                .insert("Retry-After", HeaderValue::from(retry_after));
            response
        }
    }
}

fn goods_routes() -> Router<Arc<AppState>> {
    Router::new().route("/create/good", post(create_good_handler))
}

fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health_check_handler))
        .route("/live", get(liveness_handler))
        .route("/ready", get(readiness_handler))
}

fn assemble(
    app_state: Arc<AppState>,
    goods: Router<Arc<AppState>>,
    health: Router<Arc<AppState>>,
    request_timeout: Duration,
) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ));

    Router::new()
        .nest("/v1", goods)
        .nest("/health", health)
        .route("/metrics", get(metrics_handler))
        .route("/api-docs/openapi.json", get(openapi_handler))
        .layer(middleware)
        .with_state(app_state)
}

/// Create router without rate limiting
pub fn create_router(app_state: Arc<AppState>) -> Router {
    assemble(
        app_state,
        goods_routes(),
        health_routes(),
        DEFAULT_REQUEST_TIMEOUT,
    )
}

/// Create router with rate limiting enabled
pub fn create_router_with_rate_limit(
    app_state: Arc<AppState>,
    config: RateLimitConfig,
    request_timeout: Duration,
) -> Router {
    let rate_limit_state = Arc::new(RateLimitState::new(config));

    let goods = goods_routes().layer(middleware::from_fn_with_state(
        Arc::clone(&rate_limit_state),
        rate_limit_goods_middleware,
    ));
    let health = health_routes().layer(middleware::from_fn_with_state(
        Arc::clone(&rate_limit_state),
        rate_limit_health_middleware,
    ));

    assemble(app_state, goods, health, request_timeout)
}
