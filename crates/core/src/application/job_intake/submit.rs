// Submit Use Case

use crate::domain::{ExchangeTarget, JobSubmission};
use crate::error::{AppError, Result};
use crate::port::Publisher;
use std::time::Duration;
use tracing::{debug, error};

/// Execute submit use case
///
/// Declares the target exchange, then publishes the canonical encoding of
/// the body to it. Publish is attempted at most once; nothing is retried.
///
/// # Arguments
///
/// * `publisher` - Broker capability (injected)
/// * `target` - Fixed exchange / routing key pair
/// * `publish_timeout` - Bound on declare + publish together
/// * `submission` - Job body as received
pub async fn execute(
    publisher: &dyn Publisher,
    target: &ExchangeTarget,
    publish_timeout: Duration,
    submission: &JobSubmission,
) -> Result<()> {
    let payload = submission.to_bytes()?;

    let declare_then_publish = async {
        publisher
            .assert_exchange(&target.exchange, target.kind)
            .await?;
        publisher
            .publish(&target.exchange, &target.routing_key, &payload)
            .await
    };

    match tokio::time::timeout(publish_timeout, declare_then_publish).await {
        Ok(Ok(())) => {
            debug!(
                exchange = %target.exchange,
                routing_key = %target.routing_key,
                bytes = payload.len(),
                "Job published"
            );
            Ok(())
        }
        Ok(Err(e)) => {
            error!(
                exchange = %target.exchange,
                routing_key = %target.routing_key,
                error = %e,
                "Failed to publish job"
            );
            Err(AppError::Publish(e))
        }
        Err(_) => {
            error!(
                exchange = %target.exchange,
                routing_key = %target.routing_key,
                timeout_ms = publish_timeout.as_millis() as u64,
                "Timed out publishing job"
            );
            Err(AppError::Timeout(publish_timeout))
        }
    }
}
