//! HTTP API gateway for ContentScout.
//!
//! Exposes the campaign pipeline over REST: a service banner, a health
//! check covering both storage backends, and `POST /run_campaign` which
//! runs a full research campaign and returns the aggregated report.
//!
//! Built on Axum.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use contentscout_config::{AppConfig, ServerConfig};
use contentscout_core::campaign::CampaignRequest;
use contentscout_orchestrator::CampaignOrchestrator;
use contentscout_store::AppContext;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub config: AppConfig,
    pub ctx: AppContext,
    pub orchestrator: CampaignOrchestrator,
}

pub type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.server);
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/run_campaign", post(run_campaign_handler))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);
    if server.cors_origins.iter().any(|origin| origin == "*") {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(AllowOrigin::list(
            server
                .cors_origins
                .iter()
                .filter_map(|origin| origin.parse().ok()),
        ))
    }
}

/// Start the gateway HTTP server on the configured host and port.
pub async fn serve(state: SharedState) -> std::io::Result<()> {
    let addr = format!(
        "{}:{}",
        state.config.server.host, state.config.server.port
    );
    let app = build_router(state);
    info!(addr = %addr, "gateway listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await
}

async fn root_handler() -> Json<serde_json::Value> {
    Json(json!({
        "service": "ContentScout",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ["/", "/health", "/run_campaign"],
    }))
}

async fn health_handler(State(state): State<SharedState>) -> Json<serde_json::Value> {
    let (store_ok, cache_ok) = state.ctx.health().await;
    let status = if store_ok && cache_ok { "ok" } else { "degraded" };
    Json(json!({
        "status": status,
        "store": store_ok,
        "cache": cache_ok,
    }))
}

/// Body of `POST /run_campaign`.
#[derive(Debug, Deserialize)]
pub struct CampaignRunRequest {
    pub campaign_name: String,
    pub topic: String,
    #[serde(default)]
    pub seed_keywords: Vec<String>,
    #[serde(default)]
    pub competitors: Vec<String>,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub persona_focus: Option<String>,
}

fn default_region() -> String {
    "global".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

impl From<CampaignRunRequest> for CampaignRequest {
    fn from(body: CampaignRunRequest) -> Self {
        CampaignRequest {
            name: body.campaign_name,
            description: None,
            topic: body.topic,
            seed_keywords: body.seed_keywords,
            competitor_urls: body.competitors,
            region: body.region,
            language: body.language,
            priority: Default::default(),
            persona_focus: body.persona_focus,
        }
    }
}

async fn run_campaign_handler(
    State(state): State<SharedState>,
    Json(body): Json<CampaignRunRequest>,
) -> Response {
    info!(campaign = %body.campaign_name, "campaign run requested");
    match state.orchestrator.run(body.into()).await {
        Ok(outcome) => match outcome.report_markdown {
            Some(markdown) => Json(json!({
                "status": "success",
                "result": markdown,
            }))
            .into_response(),
            None => error_response(
                outcome
                    .campaign
                    .error_message
                    .unwrap_or_else(|| "campaign produced no report".into()),
            ),
        },
        Err(e) => error_response(e.to_string()),
    }
}

fn error_response(detail: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"detail": detail})),
    )
        .into_response()
}
