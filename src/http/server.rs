//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the block page and health handlers
//! - Wire up middleware (request ID, tracing, request timeout)
//! - Dispatch to JSON or HTML rendering
//! - Serve until the shutdown signal fires

use axum::{
    extract::{RawQuery, State},
    http::{header::ORIGIN, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::cache::{KvStore, MemoryStore, RuleCache};
use crate::config::{BlockPageConfig, PageConfig};
use crate::error::{AppError, ServerError};
use crate::http::request::{GatewayContext, ResponseFormat};
use crate::http::response;
use crate::observability::metrics;
use crate::resolver::RuleNameResolver;
use crate::security::CorsPolicy;
use crate::upstream::RuleApiClient;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: RuleNameResolver,
    pub cors: Arc<CorsPolicy>,
    pub page: Arc<PageConfig>,
}

impl AppState {
    /// Build state from validated config, caching rule names in `store`.
    pub fn from_config(config: &BlockPageConfig, store: Arc<dyn KvStore>) -> Result<Self, ServerError> {
        let api = config
            .upstream
            .credentials()
            .map(|credentials| RuleApiClient::new(&config.upstream, credentials, &config.retries))
            .transpose()?;

        if api.is_none() {
            tracing::warn!("API token or account id not configured; rule names will be placeholders");
        }

        let cache = RuleCache::new(store, config.cache.ttl());
        Ok(Self {
            resolver: RuleNameResolver::new(cache, api),
            cors: Arc::new(CorsPolicy::from_config(&config.cors)),
            page: Arc::new(config.page.clone()),
        })
    }
}

/// HTTP server for the block page.
pub struct BlockPageServer {
    router: Router,
    config: BlockPageConfig,
}

impl BlockPageServer {
    /// Create a server with an unswept in-process cache store. Long-running
    /// deployments pass a [`MemoryStore`] with a sweeper to [`Self::with_store`].
    pub fn new(config: BlockPageConfig) -> Result<Self, ServerError> {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    /// Create a server backed by an external key-value store.
    pub fn with_store(config: BlockPageConfig, store: Arc<dyn KvStore>) -> Result<Self, ServerError> {
        let state = AppState::from_config(&config, store)?;
        let router = build_router(&config, state);
        Ok(Self { router, config })
    }

    /// The fully layered router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &BlockPageConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires, then drain.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
///
/// The request deadline is a last resort: lookups are bounded by
/// `upstream.lookup_deadline_secs`, which validation keeps below it.
pub fn build_router(config: &BlockPageConfig, state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .fallback(block_page_handler)
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::INTERNAL_SERVER_ERROR,
            Duration::from_secs(config.listener.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

async fn health() -> &'static str {
    "ok"
}

/// Every path other than `/health` renders the block page.
async fn block_page_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    let format = ResponseFormat::from_headers(&headers);
    let response = render(&state, &method, &headers, query.as_deref(), format)
        .await
        .unwrap_or_else(IntoResponse::into_response);

    metrics::record_request(format.as_str(), response.status().as_u16());
    response
}

async fn render(
    state: &AppState,
    method: &Method,
    headers: &HeaderMap,
    query: Option<&str>,
    format: ResponseFormat,
) -> Result<Response, AppError> {
    let origin = headers.get(ORIGIN);

    if *method == Method::OPTIONS {
        return Ok(response::preflight(&state.cors, origin));
    }

    let ctx = GatewayContext::from_query(query);
    if !ctx.is_present() {
        tracing::info!("Request without gateway context, denying");
        return Ok(response::access_denied());
    }

    let rule_name = state.resolver.resolve(ctx.rule_id.as_deref()).await;
    tracing::debug!(
        rule_id = ?ctx.rule_id,
        rule_name = %rule_name,
        format = format.as_str(),
        "Rendering block page"
    );

    match format {
        ResponseFormat::Json => response::json_page(&ctx, &rule_name, &state.cors, origin),
        ResponseFormat::Html => response::html_page(&ctx, &rule_name, &state.page),
    }
}
