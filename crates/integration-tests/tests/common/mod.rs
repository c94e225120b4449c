#![allow(dead_code)]

//! Shared setup: a real HTTP server on an ephemeral port backed by the
//! in-memory publisher.

use std::sync::Arc;
use std::time::Duration;

use jobgate_api_http::{HttpServer, HttpServerConfig, RunningServer};
use jobgate_core::application::JobIntakeService;
use jobgate_core::domain::{CredentialSet, ExchangeTarget};
use jobgate_core::port::InMemoryPublisher;

pub const VALID_KEY: &str = "abc123";

pub struct TestGateway {
    pub server: RunningServer,
    pub publisher: InMemoryPublisher,
    pub client: reqwest::Client,
}

impl TestGateway {
    pub async fn start(routing_key: &str) -> Self {
        let publisher = InMemoryPublisher::new();
        let intake = JobIntakeService::new(
            Arc::new(publisher.clone()),
            ExchangeTarget::new("job", routing_key).unwrap(),
        )
        .with_publish_timeout(Duration::from_millis(200));

        let server = HttpServer::new(
            HttpServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                ..Default::default()
            },
            Arc::new(intake),
            Arc::new(CredentialSet::new([VALID_KEY])),
        )
        .start()
        .await
        .unwrap();

        Self {
            server,
            publisher,
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.server.local_addr(), path)
    }

    pub async fn submit(&self, key: Option<&str>, body: &str) -> reqwest::Response {
        let mut req = self
            .client
            .post(self.url("/jobs/"))
            .header("content-type", "application/json")
            .body(body.to_string());
        if let Some(key) = key {
            req = req.header("x-api-key", key);
        }
        req.send().await.unwrap()
    }

    pub async fn stop(self) {
        self.server.stop().await.unwrap();
    }
}
