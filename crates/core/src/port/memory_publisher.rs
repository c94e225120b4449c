//! In-memory publisher for testing without a real broker.

use crate::domain::ExchangeKind;
use crate::port::publisher::{PublishError, Publisher};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One captured `publish` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub exchange: String,
    pub routing_key: String,
    pub payload: Vec<u8>,
}

/// Behaviour of the in-memory publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublisherMode {
    #[default]
    Healthy,
    /// `assert_exchange` fails with a channel error.
    FailAssert,
    /// `publish` fails with a connection error.
    FailPublish,
    /// Every call hangs forever (a stalled broker).
    Stall,
    /// `publish` succeeds after the given delay (a slow broker).
    Delay(Duration),
}

#[derive(Default)]
struct Recorded {
    declared: Vec<(String, ExchangeKind)>,
    published: Vec<PublishedMessage>,
}

/// Publisher that records every call.
///
/// # Example
/// ```rust,ignore
/// let publisher = InMemoryPublisher::new();
/// service.submit(&submission).await?;
/// assert_eq!(publisher.publish_count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryPublisher {
    mode: Arc<Mutex<PublisherMode>>,
    recorded: Arc<Mutex<Recorded>>,
}

impl InMemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: PublisherMode) -> Self {
        let publisher = Self::new();
        publisher.set_mode(mode);
        publisher
    }

    pub fn set_mode(&self, mode: PublisherMode) {
        *self.mode.lock().unwrap() = mode;
    }

    /// Snapshot of all successful publishes, in call order.
    pub fn published_messages(&self) -> Vec<PublishedMessage> {
        self.recorded.lock().unwrap().published.clone()
    }

    pub fn publish_count(&self) -> usize {
        self.recorded.lock().unwrap().published.len()
    }

    /// Snapshot of all successful exchange declarations.
    pub fn declared_exchanges(&self) -> Vec<(String, ExchangeKind)> {
        self.recorded.lock().unwrap().declared.clone()
    }

    fn mode(&self) -> PublisherMode {
        *self.mode.lock().unwrap()
    }
}

#[async_trait]
impl Publisher for InMemoryPublisher {
    async fn assert_exchange(&self, name: &str, kind: ExchangeKind) -> Result<(), PublishError> {
        match self.mode() {
            PublisherMode::Stall => std::future::pending().await,
            PublisherMode::FailAssert => Err(PublishError::Channel(format!(
                "cannot declare exchange '{}'",
                name
            ))),
            PublisherMode::Healthy | PublisherMode::FailPublish | PublisherMode::Delay(_) => {
                self.recorded
                    .lock()
                    .unwrap()
                    .declared
                    .push((name.to_string(), kind));
                Ok(())
            }
        }
    }

    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        payload: &[u8],
    ) -> Result<(), PublishError> {
        let mode = self.mode();
        if let PublisherMode::Delay(delay) = mode {
            tokio::time::sleep(delay).await;
        }

        match mode {
            PublisherMode::Stall => std::future::pending().await,
            PublisherMode::FailPublish => {
                Err(PublishError::Connection("broker unreachable".to_string()))
            }
            PublisherMode::Healthy | PublisherMode::FailAssert | PublisherMode::Delay(_) => {
                self.recorded.lock().unwrap().published.push(PublishedMessage {
                    exchange: exchange.to_string(),
                    routing_key: routing_key.to_string(),
                    payload: payload.to_vec(),
                });
                Ok(())
            }
        }
    }
}
