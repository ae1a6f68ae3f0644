use axum::{
    middleware::from_fn,
    routing::{get, post, MethodRouter},
    Router,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use you2api_types::models::{AppConfig, BridgeConfig};

use crate::error::BridgeResult;
use crate::proxy::common::ModelMapper;
use crate::proxy::handlers;
use crate::proxy::middleware::{
    allow_headers_layer, allow_methods_layer, auth_middleware, cors_layer, metrics_middleware,
    options_short_circuit,
};
use crate::proxy::passthrough::build_passthrough_router;
use crate::proxy::upstream::{YouChatApi, YouChatClient};

/// Chat completion paths; all share one handler.
const CHAT_COMPLETION_PATHS: &[&str] = &[
    "/v1/chat/completions",
    "/api/v1/chat/completions",
    "/none/v1/chat/completions",
    "/such/chat/completions",
];

/// Axum application state. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<dyn YouChatApi>,
    pub models: Arc<ModelMapper>,
    pub bridge: Arc<BridgeConfig>,
}

impl AppState {
    pub fn new(upstream: Arc<dyn YouChatApi>, bridge: BridgeConfig) -> Self {
        let models = ModelMapper::new(&bridge.agent_model_ids);
        Self { upstream, models: Arc::new(models), bridge: Arc::new(bridge) }
    }

    /// State backed by the real upstream client.
    pub fn from_config(bridge: &BridgeConfig) -> BridgeResult<Self> {
        let client = YouChatClient::new(bridge)?;
        Ok(Self::new(Arc::new(client), bridge.clone()))
    }
}

/// Routes match on path alone: an unhandled method gets the liveness banner, not 405.
fn or_liveness(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.fallback(handlers::handle_liveness)
}

fn api_routes(state: AppState) -> Router {
    let chat = or_liveness(
        post(handlers::openai::handle_chat_completions).route_layer(from_fn(auth_middleware)),
    );
    let models = or_liveness(get(handlers::openai::handle_list_models));
    let health = or_liveness(get(handlers::handle_health));

    CHAT_COMPLETION_PATHS
        .iter()
        .fold(Router::new(), |router, path| router.route(path, chat.clone()))
        .route("/v1/models", models.clone())
        .route("/api/v1/models", models)
        .route("/health", health.clone())
        .route("/healthz", health)
        .route("/metrics", or_liveness(get(handlers::handle_metrics)))
        .fallback(handlers::handle_liveness)
        .with_state(state)
}

/// Layers run outermost first: CORS, method/header allowances, OPTIONS
/// short-circuit, tracing, metrics.
fn with_layers(router: Router) -> Router {
    router
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(options_short_circuit))
        .layer(allow_headers_layer())
        .layer(allow_methods_layer())
        .layer(cors_layer())
}

/// OpenAI-compatible surface plus service endpoints.
pub fn build_proxy_router(state: AppState) -> Router {
    with_layers(api_routes(state))
}

/// Full application: the API surface and, when configured, the `/proxy` passthrough.
pub fn build_app_router(config: &AppConfig) -> BridgeResult<Router> {
    let state = AppState::from_config(&config.bridge)?;
    let mut router = api_routes(state);

    if config.proxy.is_active() {
        router = router.merge(build_passthrough_router(&config.proxy)?);
    }

    Ok(with_layers(router))
}

/// Axum server instance
pub struct AxumServer {
    config: AppConfig,
}

impl AxumServer {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> BridgeResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = build_app_router(&self.config)?;

        if let Ok(addr) = listener.local_addr() {
            tracing::info!("Starting Axum server on {}", addr);
        }
        tracing::info!(
            "[Server] Upstream {} (market {}), {} agent model(s), passthrough {}",
            self.config.bridge.upstream_base_url,
            self.config.bridge.market,
            self.config.bridge.agent_model_ids.len(),
            if self.config.proxy.is_active() { "on" } else { "off" }
        );

        axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
        Ok(())
    }
}
