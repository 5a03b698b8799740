//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with one catch-all handler
//! - Wire up middleware (tracing, timeout, body limit, request ID)
//! - Bind server to listener
//! - Dispatch requests to the route table
//! - Swap in a new route table when the configuration changes

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::controller::{ControllerRegistry, RequestContext};
use crate::http::{request, response};
use crate::observability::metrics;
use crate::routing::{Router, RouterError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Current route table; replaced wholesale on reload.
    pub routes: Arc<ArcSwap<Router>>,
    pub controllers: Arc<ControllerRegistry>,
}

/// HTTP front end of the framework.
pub struct HttpServer {
    router: axum::Router,
    routes: Arc<ArcSwap<Router>>,
}

impl HttpServer {
    /// Create a server dispatching through `routes` to `controllers`.
    pub fn new(config: AppConfig, routes: Router, controllers: ControllerRegistry) -> Self {
        metrics::record_routes_loaded(routes.len());

        let routes = Arc::new(ArcSwap::from_pointee(routes));
        let state = AppState {
            routes: routes.clone(),
            controllers: Arc::new(controllers),
        };

        let router = Self::build_router(&config, state);
        Self { router, routes }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> axum::Router {
        axum::Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Each configuration received on `config_updates` rebuilds the route
    /// table; a table that fails to build leaves the current one in place.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<AppConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.routes.load().len(),
            "HTTP server starting"
        );

        let routes = self.routes.clone();
        let mut reload_shutdown = shutdown.resubscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    update = config_updates.recv() => match update {
                        Some(config) => {
                            if let Err(e) = reload_routes(&routes, &config) {
                                tracing::error!(error = %e, "Route reload rejected");
                            }
                        }
                        None => break,
                    },
                    _ = reload_shutdown.recv() => break,
                }
            }
        });

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

/// Rebuild the route table from `config` and swap it in.
pub fn reload_routes(routes: &ArcSwap<Router>, config: &AppConfig) -> Result<usize, RouterError> {
    let table = Router::from_config(&config.routes)?;
    let count = table.len();
    routes.store(Arc::new(table));

    metrics::record_routes_loaded(count);
    tracing::info!(routes = count, "Route table reloaded");
    Ok(count)
}

/// Catch-all handler: match the path, run the controller action.
async fn dispatch_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start = Instant::now();
    let request_id = request::request_id(&headers);
    let params = request::params(&uri, &headers, &body);
    let Some(path) = request::decoded_path(&uri) else {
        tracing::warn!(request_id = %request_id, path = %uri.path(), "Path is not valid UTF-8");
        metrics::record_dispatch(method.as_str(), "bad_path", start);
        return (StatusCode::BAD_REQUEST, "request path is not valid UTF-8").into_response();
    };

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Dispatching request"
    );

    let routes = state.routes.load_full();
    let context = RequestContext::new(request_id.clone(), params);
    let result = routes
        .dispatch(&path, &method, state.controllers.as_ref(), context)
        .await;

    match result {
        Ok(reply) => {
            metrics::record_dispatch(method.as_str(), "ok", start);
            reply.into_response()
        }
        Err(e) => {
            let status = e.status();
            if status.is_server_error() {
                tracing::error!(request_id = %request_id, path = %path, error = %e, "Dispatch failed");
            } else {
                tracing::warn!(request_id = %request_id, path = %path, error = %e, "Dispatch rejected");
            }
            metrics::record_dispatch(method.as_str(), e.kind(), start);
            response::error_response(&e)
        }
    }
}
