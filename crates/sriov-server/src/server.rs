use crate::handlers::*;
use crate::AppState;
use axum::routing::{get, post, put};
use axum::Router;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Port the scheduler policy points at by default
pub const DEFAULT_PORT: u16 = 8888;

/// Extender server configuration
#[derive(Clone)]
pub struct Config {
    /// Address to listen on
    pub listen_addr: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
        }
    }
}

/// Extender HTTP server
pub struct ApiServer {
    config: Config,
    state: Arc<AppState>,
}

impl ApiServer {
    /// Create a new extender server
    pub fn new(config: Config, state: Arc<AppState>) -> Self {
        Self { config, state }
    }

    /// Build the router
    fn build_router(&self) -> Router {
        Router::new()
            // Health checks
            .route("/healthz", get(healthz))
            .route("/livez", get(livez))
            .route("/readyz", get(readyz))
            // Scheduler extender verb
            .route("/filter", post(filter_nodes))
            .route("/api/v1/filter", post(filter_nodes))
            // Introspection and reconciliation
            .route("/api/v1/state", get(get_state))
            .route("/api/v1/ledger/{node}", put(set_ledger_entry))
            // Add tracing and state
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the server
    pub async fn run(self) -> Result<(), std::io::Error> {
        let app = self.build_router();

        info!("Starting extender server on {}", self.config.listen_addr);

        let listener = TcpListener::bind(self.config.listen_addr).await?;

        axum::serve(listener, app).await
    }
}

/// Health check endpoint
async fn healthz() -> &'static str {
    "ok"
}

/// Liveness probe
async fn livez() -> &'static str {
    "ok"
}

/// Readiness probe
async fn readyz() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use sriov_extender::Extender;
    use tower::ServiceExt;

    fn create_test_server() -> (ApiServer, Arc<AppState>) {
        let state = Arc::new(AppState::new(Arc::new(Extender::default())));
        (ApiServer::new(Config::default(), state.clone()), state)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.listen_addr.to_string(), "127.0.0.1:8888");
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let (server, _state) = create_test_server();
        let router = server.build_router();

        for path in ["/healthz", "/livez", "/readyz"] {
            let request = Request::builder().uri(path).body(Body::empty()).unwrap();
            let response = router.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{}", path);
        }
    }

    #[tokio::test]
    async fn test_both_filter_paths_share_state() {
        let (server, state) = create_test_server();
        let router = server.build_router();

        let body = json!({
            "pod": {
                "metadata": {
                    "name": "web-0",
                    "namespace": "default",
                    "annotations": { "networks": "sriov" }
                }
            },
            "nodes": { "items": [{
                "metadata": { "name": "worker-1" },
                "status": { "allocatable": { "totalvfs": "2" } }
            }] }
        });

        for path in ["/filter", "/api/v1/filter"] {
            let request = Request::builder()
                .method("POST")
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap();
            let response = router.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);

            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let result: Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(result["nodes"]["items"].as_array().unwrap().len(), 1);
        }

        assert_eq!(state.extender.global_promised_count(), 2);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (server, _state) = create_test_server();
        let request = Request::builder()
            .uri("/prioritize")
            .body(Body::empty())
            .unwrap();
        let response = server.build_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
