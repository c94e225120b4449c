//! HTTP Server
//!
//! Builds the axum router and runs it on a TCP listener with graceful
//! shutdown.

use crate::auth::require_api_key;
use crate::error::ServerError;
use crate::handler;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use jobgate_core::application::JobIntakeService;
use jobgate_core::domain::CredentialSet;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// HTTP Server Configuration
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
    pub body_limit: usize,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub intake: Arc<JobIntakeService>,
    pub credentials: Arc<CredentialSet>,
}

/// Build the router.
///
/// `/jobs` and `/jobs/` both accept POST; the credential gate is a route
/// layer so it only wraps job intake.
pub fn router(state: AppState, body_limit: usize) -> Router {
    let jobs = Router::new()
        .route("/jobs", post(handler::submit_job))
        .route("/jobs/", post(handler::submit_job))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ))
        .layer(DefaultBodyLimit::max(body_limit));

    Router::new()
        .route("/", get(handler::health))
        .merge(jobs)
        .fallback(handler::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// HTTP Server
pub struct HttpServer {
    config: HttpServerConfig,
    state: AppState,
}

impl HttpServer {
    pub fn new(
        config: HttpServerConfig,
        intake: Arc<JobIntakeService>,
        credentials: Arc<CredentialSet>,
    ) -> Self {
        Self {
            config,
            state: AppState {
                intake,
                credentials,
            },
        }
    }

    /// Bind the listener and start serving in the background.
    pub async fn start(self) -> Result<RunningServer, ServerError> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

        info!(addr = %local_addr, "HTTP server listening");

        let app = router(self.state, self.config.body_limit);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
                .map_err(|source| ServerError::Serve {
                    addr: local_addr,
                    source,
                })
        });

        Ok(RunningServer {
            local_addr,
            shutdown_tx,
            task,
        })
    }
}

/// Handle to a started server
pub struct RunningServer {
    local_addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<Result<(), ServerError>>,
}

impl RunningServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn stop(self) -> Result<(), ServerError> {
        let _ = self.shutdown_tx.send(());
        self.task
            .await
            .map_err(|e| ServerError::Join(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use jobgate_core::domain::ExchangeTarget;
    use jobgate_core::port::{InMemoryPublisher, PublisherMode};
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_router(publisher: &InMemoryPublisher) -> Router {
        let intake = JobIntakeService::new(
            Arc::new(publisher.clone()),
            ExchangeTarget::new("job", "").unwrap(),
        )
        .with_publish_timeout(Duration::from_millis(100));

        router(
            AppState {
                intake: Arc::new(intake),
                credentials: Arc::new(CredentialSet::new(["abc123"])),
            },
            DEFAULT_BODY_LIMIT,
        )
    }

    fn post_job(key: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/jobs/")
            .header("content-type", "application/json");
        if let Some(key) = key {
            builder = builder.header("x-api-key", key);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn read_json(resp: axum::response::Response) -> Value {
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_open_and_broker_independent() {
        let publisher = InMemoryPublisher::with_mode(PublisherMode::Stall);
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();

        let resp = test_router(&publisher).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(read_json(resp).await, json!({"status": "Server is running"}));
    }

    #[tokio::test]
    async fn test_valid_key_publishes_body() {
        let publisher = InMemoryPublisher::new();
        let resp = test_router(&publisher)
            .oneshot(post_job(Some("abc123"), r#"{"task":"resize","id":42}"#))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(read_json(resp).await, json!({"status": "Job Submitted"}));

        let messages = publisher.published_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].exchange, "job");
        assert_eq!(messages[0].routing_key, "");
        assert_eq!(messages[0].payload, br#"{"task":"resize","id":42}"#.to_vec());
    }

    #[tokio::test]
    async fn test_wrong_or_missing_key_is_rejected_without_publish() {
        let publisher = InMemoryPublisher::new();

        for key in [Some("wrong"), Some(""), Some("ABC123"), None] {
            let resp = test_router(&publisher)
                .oneshot(post_job(key, r#"{"task":"resize"}"#))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(read_json(resp).await, json!({"error": "Unauthorized"}));
        }

        assert_eq!(publisher.publish_count(), 0);
        assert!(publisher.declared_exchanges().is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_wins_over_invalid_body() {
        let publisher = InMemoryPublisher::new();
        let resp = test_router(&publisher)
            .oneshot(post_job(Some("wrong"), "{not json"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_route_without_trailing_slash() {
        let publisher = InMemoryPublisher::new();
        let req = Request::builder()
            .method("POST")
            .uri("/jobs")
            .header("x-api-key", "abc123")
            .body(Body::from("{}"))
            .unwrap();

        let resp = test_router(&publisher).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(publisher.publish_count(), 1);
    }

    #[tokio::test]
    async fn test_publish_failure_returns_500() {
        let publisher = InMemoryPublisher::with_mode(PublisherMode::FailPublish);
        let resp = test_router(&publisher)
            .oneshot(post_job(Some("abc123"), "{}"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(read_json(resp).await, json!({"error": "Failed to submit job"}));
    }

    #[tokio::test]
    async fn test_stalled_broker_returns_500() {
        let publisher = InMemoryPublisher::with_mode(PublisherMode::Stall);
        let resp = test_router(&publisher)
            .oneshot(post_job(Some("abc123"), "{}"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(read_json(resp).await, json!({"error": "Failed to submit job"}));
    }

    #[tokio::test]
    async fn test_invalid_json_returns_400_without_publish() {
        let publisher = InMemoryPublisher::new();
        for body in ["", "{not json"] {
            let resp = test_router(&publisher)
                .oneshot(post_job(Some("abc123"), body))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            assert_eq!(read_json(resp).await, json!({"error": "Invalid JSON body"}));
        }
        assert_eq!(publisher.publish_count(), 0);
    }

    #[tokio::test]
    async fn test_text_plain_body_is_published_as_json_string() {
        let publisher = InMemoryPublisher::new();
        let req = Request::builder()
            .method("POST")
            .uri("/jobs/")
            .header("content-type", "text/plain")
            .header("x-api-key", "abc123")
            .body(Body::from("resize image 42"))
            .unwrap();

        let resp = test_router(&publisher).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(read_json(resp).await, json!({"status": "Job Submitted"}));

        let messages = publisher.published_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].payload, br#""resize image 42""#.to_vec());
    }

    #[tokio::test]
    async fn test_unsupported_content_type_returns_415_without_publish() {
        let publisher = InMemoryPublisher::new();
        let req = Request::builder()
            .method("POST")
            .uri("/jobs/")
            .header("content-type", "application/octet-stream")
            .header("x-api-key", "abc123")
            .body(Body::from(vec![0u8, 1, 2]))
            .unwrap();

        let resp = test_router(&publisher).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(
            read_json(resp).await,
            json!({"error": "Unsupported Media Type"})
        );
        assert_eq!(publisher.publish_count(), 0);
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let publisher = InMemoryPublisher::new();
        let big = format!("\"{}\"", "x".repeat(DEFAULT_BODY_LIMIT + 1));
        let resp = test_router(&publisher)
            .oneshot(post_job(Some("abc123"), &big))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(publisher.publish_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_route_returns_json_404() {
        let publisher = InMemoryPublisher::new();
        let req = Request::builder()
            .uri("/nope")
            .body(Body::empty())
            .unwrap();

        let resp = test_router(&publisher).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_json(resp).await, json!({"error": "Not Found"}));
    }

    #[tokio::test]
    async fn test_start_and_stop_on_ephemeral_port() {
        let publisher = InMemoryPublisher::new();
        let intake = JobIntakeService::new(
            Arc::new(publisher),
            ExchangeTarget::new("job", "").unwrap(),
        );
        let server = HttpServer::new(
            HttpServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                ..Default::default()
            },
            Arc::new(intake),
            Arc::new(CredentialSet::default()),
        );

        let running = server.start().await.unwrap();
        assert_ne!(running.local_addr().port(), 0);
        running.stop().await.unwrap();
    }
}
