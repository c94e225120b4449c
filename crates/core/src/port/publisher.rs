// Publisher Port (Interface)

use crate::domain::ExchangeKind;
use async_trait::async_trait;
use thiserror::Error;

/// Failure while talking to the broker.
///
/// Every variant is recoverable at the request boundary; none of them
/// should bring the process down.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    #[error("Broker connection unavailable: {0}")]
    Connection(String),

    #[error("Channel error: {0}")]
    Channel(String),

    #[error("Broker rejected operation: {0}")]
    Rejected(String),
}

/// Broker capability used by the job intake use case.
///
/// Implementations share one long-lived connection/channel and must be
/// safe for concurrent callers. Disconnection has to surface as an error
/// rather than a hang; callers still bound every call with a timeout.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Declare the exchange if it does not exist yet (idempotent).
    async fn assert_exchange(&self, name: &str, kind: ExchangeKind) -> Result<(), PublishError>;

    /// Hand `payload` to the broker for `exchange` / `routing_key`.
    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        payload: &[u8],
    ) -> Result<(), PublishError>;
}
