use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Json, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use tourism_agents::PublicApiAgent;
use tourism_core::TourismQuery;
use tourism_observability::AppMetrics;
use tourism_tools::{Toolbox, ToolsConfig};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

const MAX_QUERY_CHARS: usize = 1_000;
const MAX_BODY_BYTES: usize = 16 * 1024;
const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Clone)]
pub struct ApiState {
    pub agent: Arc<PublicApiAgent>,
    pub metrics: Arc<AppMetrics>,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub tools: ToolsConfig,
    /// Empty means any origin may call the API.
    pub allowed_origins: Vec<String>,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            tools: ToolsConfig::from_env().context("invalid upstream configuration")?,
            allowed_origins: parse_allowed_origins(),
        })
    }
}

#[derive(Debug, Serialize)]
struct ServiceBanner {
    message: &'static str,
    version: &'static str,
    endpoints: BannerEndpoints,
}

#[derive(Debug, Serialize)]
struct BannerEndpoints {
    health: &'static str,
    query: &'static str,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    metrics: tourism_observability::MetricsSnapshot,
}

pub fn build_app(config: ApiConfig) -> Result<Router> {
    let metrics = AppMetrics::shared();
    let toolbox = Toolbox::from_config(&config.tools).context("failed to build upstream clients")?;
    let agent = Arc::new(PublicApiAgent::from_toolbox(toolbox, metrics.clone()));

    let state = ApiState { agent, metrics };
    Ok(build_router(state, &config.allowed_origins))
}

pub fn build_router(state: ApiState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .route("/api/query", post(process_query))
        .layer(build_cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        // outermost of the pair, so the id exists before it is propagated
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}

async fn root() -> impl IntoResponse {
    Json(ServiceBanner {
        message: "Tourism AI API",
        version: SERVICE_VERSION,
        endpoints: BannerEndpoints {
            health: "/api/health",
            query: "/api/query",
        },
    })
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "healthy",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        metrics: state.metrics.snapshot(),
    };
    (StatusCode::OK, Json(payload))
}

async fn process_query(
    State(state): State<ApiState>,
    Json(request): Json<TourismQuery>,
) -> Response {
    let query = request.query.trim();
    if query.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "empty_query",
            "query must not be empty",
        );
    }
    if query.chars().count() > MAX_QUERY_CHARS {
        return error_response(
            StatusCode::BAD_REQUEST,
            "query_too_long",
            "query must be at most 1000 characters",
        );
    }

    match state.agent.answer(query).await {
        Ok(answer) => (StatusCode::OK, Json(answer)).into_response(),
        Err(error) => {
            tracing::error!(error = %error, "query failed");
            error_response(
                StatusCode::BAD_REQUEST,
                "query_failed",
                error.to_string().as_str(),
            )
        }
    }
}

fn error_response(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": code,
            "message": message
        })),
    )
        .into_response()
}

fn parse_allowed_origins() -> Vec<String> {
    env::var("TOURISM_ALLOWED_ORIGINS")
        .ok()
        .map(|value| {
            value
                .split(',')
                .map(|origin| origin.trim().trim_end_matches('/').to_string())
                .filter(|origin| !origin.is_empty() && origin != "*")
                .collect::<Vec<_>>()
        })
        .unwrap_or_default()
}

fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true)
    }
}
